pub mod token;
pub mod postprocess;
#[cfg(feature = "terminal_printing")]
pub mod printing;

use serde_json::{Map, Value};

pub type JsonMap = Map<String, Value>;
