pub mod backend;
pub mod connectivity;
pub mod engine;
pub mod hud_decoder;
pub mod interceptor;
pub mod llm_client;
pub mod phase_machine;
pub mod prompt_builder;
pub mod protocol;
pub mod response_parser;
pub mod save_manager;
pub mod session;
