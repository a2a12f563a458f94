mod encode_scenarios;
