mod anthropic_client_test;
