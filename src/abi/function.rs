//! Function descriptors.
//!
//! A [`Function`] is the parsed form of one ABI function: its name, input
//! and output schemas, and the 4-byte [`Selector`] derived from its
//! canonical signature.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::decode::decode;
use super::encode::encode;
use super::error::{AbiError, Result};
use super::param_type::{split_top_level, ParamType};
use super::value::{encode_hex, keccak256, Value};

/// 4-byte function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Selector of a canonical signature such as `foo(uint256)`.
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        Selector([hash[0], hash[1], hash[2], hash[3]])
    }

    /// The first four bytes of `data`, if present.
    pub fn from_call_data(data: &[u8]) -> Option<Self> {
        let head: [u8; 4] = data.get(..4)?.try_into().ok()?;
        Some(Selector(head))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(&self.0))
    }
}

/// Declared state mutability of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    NonPayable,
    Payable,
}

/// A named function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, empty when unnamed.
    pub name: String,
    pub kind: ParamType,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A parsed ABI function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub state_mutability: StateMutability,
}

impl Function {
    /// Parse a human-readable signature.
    ///
    /// Accepts forms such as `function foo(uint256 x) pure returns (uint256)`
    /// and the bare canonical `foo(uint256)`.
    pub fn parse(signature: &str) -> Result<Self> {
        let invalid = |reason: &str| AbiError::InvalidSignature {
            signature: signature.to_string(),
            reason: reason.to_string(),
        };

        let text = signature.trim();
        let text = text
            .strip_prefix("function ")
            .map(str::trim_start)
            .unwrap_or(text);

        let open = text.find('(').ok_or_else(|| invalid("missing parameter list"))?;
        let name = text[..open].trim();
        if !is_identifier(name) {
            return Err(invalid("invalid function name"));
        }

        let close = matching_paren(text, open).ok_or_else(|| invalid("unbalanced parentheses"))?;
        let inputs = parse_params(&text[open + 1..close])
            .map_err(|e| invalid(&e.to_string()))?;

        let mut state_mutability = StateMutability::NonPayable;
        let mut outputs = Vec::new();
        let mut rest = text[close + 1..].trim();

        while !rest.is_empty() {
            let (word, tail) = split_word(rest);
            match word {
                "pure" => state_mutability = StateMutability::Pure,
                "view" => state_mutability = StateMutability::View,
                "payable" => state_mutability = StateMutability::Payable,
                "nonpayable" => state_mutability = StateMutability::NonPayable,
                "external" | "public" => {}
                "returns" => {
                    let tail = tail.trim_start();
                    if !tail.starts_with('(') {
                        return Err(invalid("expected `(` after `returns`"));
                    }
                    let close = matching_paren(tail, 0)
                        .ok_or_else(|| invalid("unbalanced parentheses"))?;
                    outputs = parse_params(&tail[1..close]).map_err(|e| invalid(&e.to_string()))?;
                    rest = tail[close + 1..].trim();
                    continue;
                }
                other => return Err(invalid(&format!("unexpected token `{}`", other))),
            }
            rest = tail.trim();
        }

        Ok(Function {
            name: name.to_string(),
            inputs,
            outputs,
            state_mutability,
        })
    }

    /// Canonical signature, e.g. `foo(uint256,address)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.inputs.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// First four bytes of the keccak-256 hash of the signature.
    pub fn selector(&self) -> Selector {
        Selector::from_signature(&self.signature())
    }

    /// Check a function built from its public fields.
    ///
    /// [`parse`](Self::parse) output always passes.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.name) {
            return Err(AbiError::InvalidSignature {
                signature: self.signature(),
                reason: "invalid function name".to_string(),
            });
        }
        self.inputs
            .iter()
            .chain(&self.outputs)
            .try_for_each(|param| param.kind.validate())
    }

    /// Types of the inputs, in order.
    pub fn input_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Types of the outputs, in order.
    pub fn output_types(&self) -> Vec<ParamType> {
        self.outputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Decode call data arguments. `call_data` includes the selector.
    pub fn decode_input(&self, call_data: &[u8]) -> Result<Vec<Value>> {
        let args = call_data
            .get(4..)
            .ok_or(AbiError::UnexpectedEnd { offset: call_data.len() })?;
        decode(&self.input_types(), args)
    }

    /// Build call data: selector followed by the encoded arguments.
    pub fn encode_input(&self, args: &[Value]) -> Result<Vec<u8>> {
        let mut out = self.selector().0.to_vec();
        out.extend(encode(&self.input_types(), args)?);
        Ok(out)
    }

    /// Encode return values against the output schema.
    pub fn encode_output(&self, values: &[Value]) -> Result<Vec<u8>> {
        encode(&self.output_types(), values)
    }

    /// Decode return data against the output schema.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Value>> {
        decode(&self.output_types(), data)
    }
}

impl FromStr for Function {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

fn parse_params(list: &str) -> Result<Vec<Param>> {
    split_top_level(list)
        .map_err(|_| AbiError::UnknownType(list.to_string()))?
        .into_iter()
        .map(parse_param)
        .collect()
}

/// Parse `type [location] [name]`.
fn parse_param(param: &str) -> Result<Param> {
    // Tuple types may contain spaces, so the type ends at the closing
    // parenthesis plus any array suffixes.
    let (ty, rest) = if param.starts_with('(') || param.starts_with("tuple(") {
        let open = param.find('(').unwrap_or(0);
        let close = matching_paren(param, open)
            .ok_or_else(|| AbiError::UnknownType(param.to_string()))?;
        let suffix_len = param[close + 1..]
            .find(|c: char| c.is_whitespace())
            .unwrap_or(param.len() - close - 1);
        param.split_at(close + 1 + suffix_len)
    } else {
        split_word(param)
    };

    let kind = ParamType::parse(&strip_param_names(ty))?;

    let mut name = "";
    for word in rest.split_whitespace() {
        match word {
            "memory" | "calldata" | "storage" | "indexed" => {}
            other if name.is_empty() && is_identifier(other) => name = other,
            other => return Err(AbiError::UnknownType(format!("{} {}", ty, other))),
        }
    }

    Ok(Param::new(name, kind))
}

/// Drop component names from an inline tuple type such as
/// `(uint256 amount, address to)[]`.
fn strip_param_names(ty: &str) -> String {
    if !ty.contains(' ') {
        return ty.to_string();
    }

    let mut out = String::with_capacity(ty.len());
    let mut skipping = false;
    for c in ty.chars() {
        match c {
            ' ' => skipping = !out.ends_with('(') && !out.ends_with(','),
            '(' | ')' | ',' | '[' | ']' => {
                skipping = false;
                out.push(c);
            }
            _ if !skipping => out.push(c),
            _ => {}
        }
    }
    out
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let end = text
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(text.len());
    text.split_at(end)
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
