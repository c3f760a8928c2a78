mod custom_code_tests;
