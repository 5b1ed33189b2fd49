mod llm_client_factory_test;
