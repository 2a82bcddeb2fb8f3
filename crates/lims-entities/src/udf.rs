//! User-defined fields.
//!
//! Records carry site-configured extra fields as `udf:field` children of the
//! document root, each tagged with a `type` attribute, optionally grouped
//! under a named `udf:type` element (a user-defined type, UDT). Values are
//! decoded into [`UdfValue`] and type-checked on write: assigning a value
//! whose type differs from the field's declared type is a
//! [`ValidationError`], never a silent coercion.

use async_trait::async_trait;
use chrono::NaiveDate;
use lims_core::{Entity, LimsError, ParseError, ValidationError};
use lims_xml::{Element, Name};

/// A user-defined field value, matching the server's `type` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum UdfValue {
    #[allow(missing_docs)]
    String(String),
    /// Multi-line text; same content model as `String` with a distinct
    /// declared type.
    Text(String),
    #[allow(missing_docs)]
    Numeric(f64),
    #[allow(missing_docs)]
    Boolean(bool),
    #[allow(missing_docs)]
    Date(NaiveDate),
}

impl UdfValue {
    /// The server's name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            UdfValue::String(_) => "String",
            UdfValue::Text(_) => "Text",
            UdfValue::Numeric(_) => "Numeric",
            UdfValue::Boolean(_) => "Boolean",
            UdfValue::Date(_) => "Date",
        }
    }

    fn encode(&self) -> String {
        match self {
            UdfValue::String(value) | UdfValue::Text(value) => value.clone(),
            UdfValue::Numeric(value) => value.to_string(),
            UdfValue::Boolean(value) => if *value { "true" } else { "false" }.to_owned(),
            UdfValue::Date(value) => value.format("%Y-%m-%d").to_string(),
        }
    }

    fn decode(declared: &str, text: &str) -> Result<UdfValue, ParseError> {
        let malformed = || ParseError::Malformed {
            kind: "UDF value",
            value: text.to_owned(),
        };
        match declared {
            "String" => Ok(UdfValue::String(text.to_owned())),
            "Text" => Ok(UdfValue::Text(text.to_owned())),
            "Numeric" => text
                .trim()
                .parse()
                .map(UdfValue::Numeric)
                .map_err(|_| malformed()),
            "Boolean" => match text.trim() {
                "true" => Ok(UdfValue::Boolean(true)),
                "false" => Ok(UdfValue::Boolean(false)),
                _ => Err(malformed()),
            },
            "Date" => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map(UdfValue::Date)
                .map_err(|_| malformed()),
            other => Err(ParseError::Malformed {
                kind: "UDF type",
                value: other.to_owned(),
            }),
        }
    }
}

fn field_name() -> Name {
    Name::qualified("udf", "field").expect("the udf prefix is part of the schema table")
}

fn udt_name() -> Name {
    Name::qualified("udf", "type").expect("the udf prefix is part of the schema table")
}

fn decode_fields(parent: &Element) -> Result<Vec<(String, UdfValue)>, ParseError> {
    let field = field_name();
    parent
        .children()
        .iter()
        .filter(|node| *node.name() == field)
        .map(|node| {
            let name = node.attr("name").ok_or(ParseError::MissingAttribute {
                element: "udf:field".to_owned(),
                attribute: "name",
            })?;
            let declared = node.attr("type").unwrap_or("String");
            let value = UdfValue::decode(declared, node.text().unwrap_or_default())?;
            Ok((name.to_owned(), value))
        })
        .collect()
}

pub(crate) fn set_field(
    parent: &mut Element,
    name: &str,
    value: &UdfValue,
) -> Result<(), LimsError> {
    let field = field_name();
    let existing = parent
        .children()
        .iter()
        .position(|node| *node.name() == field && node.attr("name") == Some(name));
    match existing {
        Some(index) => {
            let node = &mut parent.children_mut()[index];
            let declared = node.attr("type").unwrap_or("String").to_owned();
            if declared != value.type_name() {
                return Err(ValidationError(format!(
                    "UDF '{name}' is declared as {declared}, cannot assign a {} value",
                    value.type_name()
                ))
                .into());
            }
            node.set_text(value.encode());
        }
        None => {
            // A field the record does not carry yet takes its declared type
            // from the assigned value.
            let node = parent.push_child(Element::new(field));
            node.set_attr("type", value.type_name());
            node.set_attr("name", name);
            node.set_text(value.encode());
        }
    }
    Ok(())
}

/// User-defined field access for entity types whose records carry them.
#[async_trait]
pub trait UdfContainer: Entity {
    /// All user-defined fields of the record, in document order.
    async fn udfs(&self) -> Result<Vec<(String, UdfValue)>, LimsError> {
        Ok(self.handle().with_tree(decode_fields).await??)
    }

    /// One user-defined field by name.
    async fn udf(&self, name: &str) -> Result<Option<UdfValue>, LimsError> {
        let fields = self.udfs().await?;
        Ok(fields.into_iter().find(|(n, _)| n == name).map(|(_, v)| v))
    }

    /// Assign a user-defined field, type-checked against the field's
    /// declared type.
    async fn set_udf(&self, name: &str, value: UdfValue) -> Result<(), LimsError> {
        self.handle()
            .mutate(|tree| set_field(tree, name, &value))
            .await
    }

    /// Remove a user-defined field. Returns whether it was present.
    async fn remove_udf(&self, name: &str) -> Result<bool, LimsError> {
        let field = field_name();
        let present = self
            .handle()
            .with_tree(|tree| {
                tree.children()
                    .iter()
                    .any(|node| *node.name() == field && node.attr("name") == Some(name))
            })
            .await?;
        if !present {
            return Ok(false);
        }
        self.handle()
            .mutate(|tree| {
                let field = field_name();
                tree.retain_children(|node| {
                    !(*node.name() == field && node.attr("name") == Some(name))
                });
                Ok(())
            })
            .await?;
        Ok(true)
    }

    /// The name of the record's user-defined type, if one is assigned.
    async fn udt(&self) -> Result<Option<String>, LimsError> {
        let wrapper = udt_name();
        self.handle()
            .with_tree(|tree| {
                tree.child(&wrapper)
                    .and_then(|node| node.attr("name"))
                    .map(str::to_owned)
            })
            .await
    }

    /// Assign the record's user-defined type by name, keeping any fields
    /// already grouped under it.
    async fn set_udt(&self, name: &str) -> Result<(), LimsError> {
        let wrapper = udt_name();
        self.handle()
            .mutate(|tree| {
                match tree.child_mut(&wrapper) {
                    Some(node) => node.set_attr("name", name),
                    None => {
                        let node = tree.push_child(Element::new(wrapper.clone()));
                        node.set_attr("name", name);
                    }
                }
                Ok(())
            })
            .await
    }

    /// The fields grouped under the record's user-defined type.
    async fn udt_fields(&self) -> Result<Vec<(String, UdfValue)>, LimsError> {
        let wrapper = udt_name();
        let fields = self
            .handle()
            .with_tree(|tree| tree.child(&wrapper).map(decode_fields).transpose())
            .await??;
        Ok(fields.unwrap_or_default())
    }

    /// Assign a field under the record's user-defined type. The UDT must
    /// have been assigned first, locally or on the server.
    async fn set_udt_field(&self, name: &str, value: UdfValue) -> Result<(), LimsError> {
        let wrapper = udt_name();
        self.handle()
            .mutate(|tree| match tree.child_mut(&wrapper) {
                Some(node) => set_field(node, name, &value),
                None => Err(ValidationError(
                    "the record has no user-defined type to assign fields under".to_owned(),
                )
                .into()),
            })
            .await
    }
}
