///! Parsed JS data values and scripts

/// A single data value from a Doxygen index file.
///
/// Object keys are kept as strings even when the file writes them as
/// bare integers (`searchdata.js` does this).
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Null,
    Int(i64),
    Str(String),
    Array(Vec<JsValue>),
    Object(Vec<(String, JsValue)>),
}

impl JsValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JsValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            JsValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsValue]> {
        match self {
            JsValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, JsValue)]> {
        match self {
            JsValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Short type label used in shape-error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsValue::Null => "null",
            JsValue::Int(_) => "integer",
            JsValue::Str(_) => "string",
            JsValue::Array(_) => "array",
            JsValue::Object(_) => "object",
        }
    }
}

/// One `var NAME = ...;` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct JsVar {
    pub name: String,
    pub value: JsValue,
}

/// All declarations of one file, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsScript {
    pub vars: Vec<JsVar>,
}

impl JsScript {
    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&JsValue> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    /// The only declaration of the file, if there is exactly one.
    pub fn single(&self) -> Option<&JsVar> {
        match self.vars.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}
