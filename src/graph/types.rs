use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Creates a transparent string identifier type with the conversions every id needs.
macro_rules! id_type {
    ($name:ident, $doc:expr) => {
        #[doc=$doc]
        #[repr(transparent)]
        #[derive(Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Default)]
        pub struct $name(String);

        impl $name {
            /// Returns a new id from anything that can become a [String].
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }
        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(NodeId, "Identifier of a [Node](super::Node) inside a [Circuit](super::Circuit).");
id_type!(
    PinId,
    "Identifier of a [Pin](super::Pin), unique within its owning node."
);
id_type!(EdgeId, "Identifier of an [Edge](super::Edge).");
id_type!(ModuleId, "Identifier of a [Module](super::Module).");

/// The [ModuleId] of the primitive 2-input NAND gate.
///
/// It never lives in a [ModuleLibrary](super::ModuleLibrary), module instance nodes
/// that reference it are evaluated directly.
pub const BUILTIN_NAND_MODULE_ID: &str = "builtin:nand";

impl ModuleId {
    /// Returns the [ModuleId] of the primitive NAND gate.
    pub fn nand() -> Self {
        Self::new(BUILTIN_NAND_MODULE_ID)
    }

    /// Returns true if `self` is the primitive NAND gate.
    #[inline(always)]
    pub fn is_nand(&self) -> bool {
        self.0 == BUILTIN_NAND_MODULE_ID
    }
}

/// Key of a single pin in a pin value map: the owning node id and the pin id joined by `:`.
///
/// # Example
/// ```
/// # use nandsim::graph::{PinKey, NodeId, PinId};
/// let key = PinKey::new(&NodeId::from("nand1"), &PinId::from("out"));
/// assert_eq!(key.to_string(), "nand1:out");
/// ```
#[repr(transparent)]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct PinKey(String);

impl PinKey {
    /// Returns the key of pin `pin` on node `node`.
    pub fn new(node: &NodeId, pin: &PinId) -> Self {
        Self(format!("{}:{}", node, pin))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Display for PinKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl Borrow<str> for PinKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Reference to one pin of one node, the unit the builder methods hand around.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PinRef {
    pub node: NodeId,
    pub pin: PinId,
}
impl PinRef {
    /// Returns a new [PinRef].
    pub fn new<N: Into<NodeId>, P: Into<PinId>>(node: N, pin: P) -> Self {
        Self {
            node: node.into(),
            pin: pin.into(),
        }
    }

    /// Returns the [PinKey] of the referenced pin.
    pub fn key(&self) -> PinKey {
        PinKey::new(&self.node, &self.pin)
    }
}
impl Display for PinRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.pin)
    }
}
