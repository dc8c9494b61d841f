mod gateway_client;
mod gradio;
#[cfg(test)]
mod test_server;

pub use gateway_client::*;
pub use gradio::*;
