#![no_main]

// Compares the decoder the encoder measures its error against with rgbcx-sys using the Ideal method.
// Extra reading: https://fgiesen.wordpress.com/2021/10/04/gpu-bcn-decoding/

use core::mem;
use dxt_block_encoder_bc1::util::decode_bc1_block;
use dxt_block_encoder_common::color_8888::Color8888;
use dxt_block_encoder_common::decoded_4x4_block::Decoded4x4Block;
use libfuzzer_sys::{arbitrary, fuzz_target};
use rgbcx_sys::root::rgbcx;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Bc1Block {
    pub bytes: [u8; 8],
}

fuzz_target!(|block: Bc1Block| {
    let ours = decode_bc1_block(&block.bytes).expect("8 bytes always decode");
    let theirs = rgbcx_decode_bc1_to_block(&block.bytes);
    assert_eq!(ours, theirs, "Decoded blocks don't match");
});

/// Decode BC1 block using rgbcx-sys with Ideal method and return it as Decoded4x4Block
fn rgbcx_decode_bc1_to_block(bc1_block: &[u8; 8]) -> Decoded4x4Block {
    let mut rgba_buffer = [0u8; 4 * 16];

    unsafe {
        rgbcx::unpack_bc1(
            bc1_block.as_ptr() as *const ::std::os::raw::c_void,
            rgba_buffer.as_mut_ptr() as *mut ::std::os::raw::c_void,
            true, // set_alpha
            rgbcx::bc1_approx_mode::cBC1Ideal,
        );
    }

    // RGBA byte order matches the layout of Color8888
    let pixels: [Color8888; 16] = unsafe { mem::transmute(rgba_buffer) };
    Decoded4x4Block { pixels }
}
