//! Library side of the `fieldnorm` command: logging setup and the stages of
//! the `normalize` command.

pub mod logging;
pub mod pipeline;
