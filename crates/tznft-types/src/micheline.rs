//! Micheline values as the node encodes them in JSON.
//!
//! Storage and operation results come back from the network as untyped JSON.
//! [`Micheline`] is the tagged union of the five node shapes; the `as_*`
//! accessors check a value against the shape the caller expects and fail with
//! [`TznftError::SchemaMismatch`] instead of trusting whatever arrived.
//!
//! `Display` renders Michelson source text, which is what the execution engine
//! accepts for `--init` and `--arg`.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::error::{Result, TznftError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Micheline {
    Int {
        int: String,
    },
    String {
        string: String,
    },
    Bytes {
        bytes: String,
    },
    Prim {
        prim: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Micheline>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        annots: Vec<String>,
    },
    Seq(Vec<Micheline>),
}

/// Branch of an `or` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrBranch<'a> {
    Left(&'a Micheline),
    Right(&'a Micheline),
}

impl Micheline {
    pub fn int(value: impl fmt::Display) -> Self {
        Self::Int {
            int: value.to_string(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            string: value.into(),
        }
    }

    pub fn address(value: &Address) -> Self {
        Self::string(value.as_str())
    }

    pub fn prim(name: &str, args: Vec<Micheline>) -> Self {
        Self::Prim {
            prim: name.to_string(),
            args,
            annots: Vec::new(),
        }
    }

    pub fn unit() -> Self {
        Self::prim("Unit", Vec::new())
    }

    pub fn pair(left: Micheline, right: Micheline) -> Self {
        Self::prim("Pair", vec![left, right])
    }

    pub fn left(value: Micheline) -> Self {
        Self::prim("Left", vec![value])
    }

    pub fn right(value: Micheline) -> Self {
        Self::prim("Right", vec![value])
    }

    pub fn elt(key: Micheline, value: Micheline) -> Self {
        Self::prim("Elt", vec![key, value])
    }

    pub fn seq(items: Vec<Micheline>) -> Self {
        Self::Seq(items)
    }

    /// Short description of the node shape, for error messages.
    pub fn kind(&self) -> String {
        match self {
            Self::Int { .. } => "int".to_string(),
            Self::String { .. } => "string".to_string(),
            Self::Bytes { .. } => "bytes".to_string(),
            Self::Prim { prim, .. } => format!("prim {}", prim),
            Self::Seq(items) => format!("sequence of {}", items.len()),
        }
    }

    pub fn as_nat(&self) -> Result<BigUint> {
        match self {
            Self::Int { int } => {
                BigUint::from_str(int).map_err(|_| TznftError::schema("nat", format!("int {}", int)))
            }
            other => Err(TznftError::schema("nat", other.kind())),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String { string } => Ok(string),
            other => Err(TznftError::schema("string", other.kind())),
        }
    }

    /// Addresses must be in readable (string) form.
    pub fn as_address(&self) -> Result<Address> {
        let s = self.as_str().map_err(|_| TznftError::schema("address", self.kind()))?;
        Address::parse(s).map_err(|_| TznftError::schema("address", format!("string {}", s)))
    }

    pub fn as_seq(&self) -> Result<&[Micheline]> {
        match self {
            Self::Seq(items) => Ok(items),
            other => Err(TznftError::schema("sequence", other.kind())),
        }
    }

    /// Arguments of a primitive application named `name`.
    pub fn expect_prim(&self, name: &str) -> Result<&[Micheline]> {
        match self {
            Self::Prim { prim, args, .. } if prim == name => Ok(args),
            other => Err(TznftError::schema(format!("prim {}", name), other.kind())),
        }
    }

    /// Split a pair into its halves. Right combs written as `Pair a b c ...`
    /// are read as `Pair a (Pair b c ...)`.
    pub fn unpair(&self) -> Result<(Micheline, Micheline)> {
        let args = self.expect_prim("Pair")?;
        match args {
            [left, right] => Ok((left.clone(), right.clone())),
            [left, rest @ ..] if rest.len() > 1 => {
                Ok((left.clone(), Micheline::prim("Pair", rest.to_vec())))
            }
            _ => Err(TznftError::schema(
                "pair of at least 2 elements",
                format!("pair of {}", args.len()),
            )),
        }
    }

    pub fn as_or(&self) -> Result<OrBranch<'_>> {
        match self {
            Self::Prim { prim, args, .. } if args.len() == 1 => match prim.as_str() {
                "Left" => Ok(OrBranch::Left(&args[0])),
                "Right" => Ok(OrBranch::Right(&args[0])),
                _ => Err(TznftError::schema("Left or Right", self.kind())),
            },
            other => Err(TznftError::schema("Left or Right", other.kind())),
        }
    }

    /// Key/value pairs of a map literal (`{ Elt k v ; ... }`).
    pub fn as_map(&self) -> Result<Vec<(&Micheline, &Micheline)>> {
        self.as_seq()?
            .iter()
            .map(|item| match item.expect_prim("Elt")? {
                [k, v] => Ok((k, v)),
                args => Err(TznftError::schema("Elt key value", format!("Elt of {}", args.len()))),
            })
            .collect()
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Micheline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { int } => f.write_str(int),
            Self::String { string } => write_escaped(f, string),
            Self::Bytes { bytes } => write!(f, "0x{}", bytes),
            Self::Prim { prim, args, annots } => {
                if args.is_empty() && annots.is_empty() {
                    return f.write_str(prim);
                }
                write!(f, "({}", prim)?;
                for annot in annots {
                    write!(f, " {}", annot)?;
                }
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                f.write_str(")")
            }
            Self::Seq(items) => {
                if items.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ; ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(" }")
            }
        }
    }
}
