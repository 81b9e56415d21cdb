pub mod chunk;
pub mod count;
pub mod emit;
pub mod error;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod top_k;
pub mod util;
