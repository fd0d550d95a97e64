//! Typed configuration tree.
//!
//! A tenant export is a tree of records. Each record is a JSON object with a
//! single key (the class tag) mapping to an object body with `attributes`
//! and `children`:
//!
//! ```json
//! {"fvBD": {"attributes": {"name": "web"}, "children": [
//!     {"fvRsCtx": {"attributes": {"tnFvCtxName": "prod"}}}
//! ]}}
//! ```
//!
//! Classes the report understands are decoded into [`ClassName`] variants and
//! have their required attributes checked while loading. Everything else is
//! kept verbatim as [`ClassName::Other`] so tree search still sees it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Class Tags
// ============================================================================

/// Class tag of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassName {
    Tenant,
    Context,
    BridgeDomain,
    L3Out,
    Contract,
    AppProfile,
    Epg,
    InstanceProfile,
    NodeProfile,
    BdSubnet,
    L3OutSubnet,
    RsContext,
    RsL3OutContext,
    RsConsumer,
    RsProvider,
    RsBridgeDomain,
    RsPathAttachment,
    Other(String),
}

impl ClassName {
    /// Decode a tag as it appears in the export.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "fvTenant" => Self::Tenant,
            "fvCtx" => Self::Context,
            "fvBD" => Self::BridgeDomain,
            "l3extOut" => Self::L3Out,
            "vzBrCP" => Self::Contract,
            "fvAp" => Self::AppProfile,
            "fvAEPg" => Self::Epg,
            "l3extInstP" => Self::InstanceProfile,
            "l3extLNodeP" => Self::NodeProfile,
            "fvSubnet" => Self::BdSubnet,
            "l3extSubnet" => Self::L3OutSubnet,
            "fvRsCtx" => Self::RsContext,
            "l3extRsEctx" => Self::RsL3OutContext,
            "fvRsCons" => Self::RsConsumer,
            "fvRsProv" => Self::RsProvider,
            "fvRsBd" => Self::RsBridgeDomain,
            "fvRsPathAtt" => Self::RsPathAttachment,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag as it appears in the export.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tenant => "fvTenant",
            Self::Context => "fvCtx",
            Self::BridgeDomain => "fvBD",
            Self::L3Out => "l3extOut",
            Self::Contract => "vzBrCP",
            Self::AppProfile => "fvAp",
            Self::Epg => "fvAEPg",
            Self::InstanceProfile => "l3extInstP",
            Self::NodeProfile => "l3extLNodeP",
            Self::BdSubnet => "fvSubnet",
            Self::L3OutSubnet => "l3extSubnet",
            Self::RsContext => "fvRsCtx",
            Self::RsL3OutContext => "l3extRsEctx",
            Self::RsConsumer => "fvRsCons",
            Self::RsProvider => "fvRsProv",
            Self::RsBridgeDomain => "fvRsBd",
            Self::RsPathAttachment => "fvRsPathAtt",
            Self::Other(tag) => tag,
        }
    }

    /// Attributes that must be present (as strings) on this class.
    pub fn required_attributes(&self) -> &'static [&'static str] {
        match self {
            Self::Tenant
            | Self::Context
            | Self::BridgeDomain
            | Self::L3Out
            | Self::Contract
            | Self::AppProfile
            | Self::Epg
            | Self::InstanceProfile
            | Self::NodeProfile => &["name"],
            Self::BdSubnet => &["ip"],
            Self::L3OutSubnet => &["ip", "scope"],
            Self::RsContext | Self::RsL3OutContext => &["tnFvCtxName"],
            Self::RsConsumer | Self::RsProvider => &["tnVzBrCPName"],
            Self::RsBridgeDomain => &["tnFvBDName"],
            Self::RsPathAttachment => &["tDn", "encap", "mode"],
            Self::Other(_) => &[],
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// Body of a record: properties plus ordered child records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagedObject {
    pub attributes: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Record>,
}

impl ManagedObject {
    /// String value of an attribute, if present and a string.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// String value of an attribute, or `""` when absent.
    pub fn attr_or_empty(&self, key: &str) -> &str {
        self.attr(key).unwrap_or_default()
    }

    /// The `name` attribute.
    pub fn name(&self) -> &str {
        self.attr_or_empty("name")
    }

    /// The `descr` attribute.
    pub fn description(&self) -> &str {
        self.attr_or_empty("descr")
    }

    /// Direct children of the given class, in document order.
    pub fn children_of(&self, class: ClassName) -> impl Iterator<Item = &ManagedObject> + '_ {
        self.children
            .iter()
            .filter(move |r| r.class == class)
            .map(|r| &r.object)
    }
}

/// One class-tagged node of the configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub class: ClassName,
    pub object: ManagedObject,
}

impl Record {
    pub fn new(class: ClassName, object: ManagedObject) -> Self {
        Self { class, object }
    }

    /// The record's body if it is of the given class.
    pub fn as_class(&self, class: &ClassName) -> Option<&ManagedObject> {
        (&self.class == class).then_some(&self.object)
    }
}

impl TryFrom<BTreeMap<String, ManagedObject>> for Record {
    type Error = String;

    fn try_from(map: BTreeMap<String, ManagedObject>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            let tags: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(format!(
                "record must have exactly one class tag, found {} [{}]",
                map.len(),
                tags.join(", ")
            ));
        }

        let (tag, object) = map.into_iter().next().ok_or("empty record")?;
        let class = ClassName::from_tag(&tag);

        for key in class.required_attributes() {
            match object.attributes.get(*key) {
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(format!(
                        "{} '{}': attribute '{}' must be a string, found {}",
                        class,
                        object.name(),
                        key,
                        other
                    ))
                }
                None => {
                    return Err(format!(
                        "{} '{}': missing required attribute '{}'",
                        class,
                        object.name(),
                        key
                    ))
                }
            }
        }

        Ok(Record { class, object })
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = BTreeMap::<String, ManagedObject>::deserialize(deserializer)?;
        Record::try_from(map).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.class.as_str(), &self.object)?;
        map.end()
    }
}
