//! JSON ABI documents.
//!
//! Reads the standard JSON ABI produced by `solc`, keeping only function
//! items. Tuple parameters are rebuilt from their `components`.

use serde::Deserialize;

use super::error::{AbiError, Result};
use super::function::{Function, Param, StateMutability};
use super::param_type::ParamType;

#[derive(Debug, Deserialize)]
struct JsonItem {
    #[serde(rename = "type", default = "default_item_type")]
    item_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<JsonParam>,
    #[serde(default)]
    outputs: Vec<JsonParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: StateMutability,
}

#[derive(Debug, Deserialize)]
struct JsonParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Vec<JsonParam>,
}

fn default_item_type() -> String {
    "function".to_string()
}

impl JsonParam {
    fn to_param(&self) -> Result<Param> {
        Ok(Param::new(self.name.clone(), self.to_type()?))
    }

    fn to_type(&self) -> Result<ParamType> {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) if suffix.is_empty() || suffix.starts_with('[') => {
                let components = self
                    .components
                    .iter()
                    .map(|c| c.to_type().map(|t| t.to_string()))
                    .collect::<Result<Vec<_>>>()?;
                ParamType::parse(&format!("({}){}", components.join(","), suffix))
            }
            _ => ParamType::parse(&self.kind),
        }
    }
}

impl JsonItem {
    fn into_function(self) -> Result<Function> {
        Ok(Function {
            name: self.name,
            inputs: self.inputs.iter().map(JsonParam::to_param).collect::<Result<_>>()?,
            outputs: self.outputs.iter().map(JsonParam::to_param).collect::<Result<_>>()?,
            state_mutability: self.state_mutability,
        })
    }
}

impl Function {
    /// Parse a single JSON ABI function fragment.
    pub fn from_json(json: &str) -> Result<Self> {
        let item: JsonItem = serde_json::from_str(json)?;
        if item.item_type != "function" {
            return Err(AbiError::InvalidSignature {
                signature: json.to_string(),
                reason: format!("expected a function item, found `{}`", item.item_type),
            });
        }
        item.into_function()
    }
}

/// The function items of a contract ABI.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    functions: Vec<Function>,
}

impl Abi {
    /// Parse a JSON ABI array. Non-function items (events, errors,
    /// constructors) are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<JsonItem> = serde_json::from_str(json)?;
        let functions = items
            .into_iter()
            .filter(|item| item.item_type == "function")
            .map(JsonItem::into_function)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { functions })
    }

    /// Build from human-readable signatures.
    pub fn from_signatures<'a>(signatures: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let functions = signatures
            .into_iter()
            .map(Function::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { functions })
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Look up a function by name.
    ///
    /// Overloaded names are rejected; register those by signature.
    pub fn function(&self, name: &str) -> Result<&Function> {
        let mut matches = self.functions.iter().filter(|f| f.name == name);
        let found = matches
            .next()
            .ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))?;
        if matches.next().is_some() {
            return Err(AbiError::AmbiguousFunction(name.to_string()));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[
        {
            "type": "function",
            "name": "foo",
            "inputs": [],
            "outputs": [{ "type": "uint256" }],
            "stateMutability": "pure"
        },
        {
            "type": "function",
            "name": "bar",
            "inputs": [{ "name": "x", "type": "uint256" }],
            "outputs": [{ "type": "uint256" }],
            "stateMutability": "pure"
        },
        {
            "type": "event",
            "name": "Transfer",
            "inputs": [],
            "anonymous": false
        },
        {
            "type": "function",
            "name": "submit",
            "inputs": [
                {
                    "name": "orders",
                    "type": "tuple[]",
                    "components": [
                        { "name": "amount", "type": "uint256" },
                        { "name": "to", "type": "address" }
                    ]
                }
            ],
            "outputs": []
        }
    ]"#;

    #[test]
    fn test_parse_abi_functions() {
        let abi = Abi::from_json(ABI).unwrap();
        assert_eq!(abi.functions().len(), 3);

        let foo = abi.function("foo").unwrap();
        assert_eq!(foo.signature(), "foo()");
        assert_eq!(foo.selector().to_string(), "0xc2985578");
        assert_eq!(foo.state_mutability, StateMutability::Pure);

        let bar = abi.function("bar").unwrap();
        assert_eq!(bar.inputs[0].name, "x");
    }

    #[test]
    fn test_tuple_components() {
        let abi = Abi::from_json(ABI).unwrap();
        let submit = abi.function("submit").unwrap();
        assert_eq!(submit.signature(), "submit((uint256,address)[])");
        assert_eq!(submit.state_mutability, StateMutability::NonPayable);
    }

    #[test]
    fn test_function_lookup_errors() {
        let abi = Abi::from_json(ABI).unwrap();
        assert!(matches!(abi.function("Transfer"), Err(AbiError::FunctionNotFound(_))));

        let overloaded = Abi::from_signatures(["f(uint256)", "f(address)"]).unwrap();
        assert!(matches!(overloaded.function("f"), Err(AbiError::AmbiguousFunction(_))));
    }

    #[test]
    fn test_single_fragment() {
        let f = Function::from_json(
            r#"{"type":"function","name":"bar","inputs":[{"type":"uint256"}],"outputs":[{"type":"uint256"}]}"#,
        )
        .unwrap();
        assert_eq!(f.signature(), "bar(uint256)");

        assert!(Function::from_json(r#"{"type":"event","name":"E","inputs":[]}"#).is_err());
        assert!(Function::from_json("not json").is_err());
    }
}
