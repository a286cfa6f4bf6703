///! JS data-literal layer
///!
///! Doxygen writes its index data as JavaScript files of the form
///! `var NAME = <literal>;`. The literals are plain data (strings,
///! integers, null, arrays, objects) and are parsed here without any
///! script evaluation.

mod entities;
mod parser;
mod value;

pub use entities::decode_entities;
pub use parser::{JsParseError, parse_script};
pub use value::{JsScript, JsValue, JsVar};
