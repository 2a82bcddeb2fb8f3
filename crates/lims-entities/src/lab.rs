//! Labs (customer accounts).

use lims_core::{EntityHandle, LimsError, ParseError};
use lims_xml::Path;

use crate::{
    externalid::HasExternalIds,
    macros::{lims_entity, string_fields},
    udf::UdfContainer,
};

lims_entity! {
    /// A lab researchers belong to.
    Lab, "Lab", "labs", "lab": "lab"
}

impl Lab {
    string_fields! {
        /// The lab's name.
        name, set_name => "name";
        website, set_website => "website";
    }

    /// The billing address as `(field, value)` pairs, e.g. `street`, `city`,
    /// `country`. Empty when the record carries no billing address.
    pub async fn billing_address(&self) -> Result<Vec<(String, String)>, LimsError> {
        string_map(&self.handle, "billing-address").await
    }

    #[allow(missing_docs)]
    pub async fn shipping_address(&self) -> Result<Vec<(String, String)>, LimsError> {
        string_map(&self.handle, "shipping-address").await
    }
}

impl UdfContainer for Lab {}
impl HasExternalIds for Lab {}

async fn string_map(
    handle: &EntityHandle,
    path: &'static str,
) -> Result<Vec<(String, String)>, LimsError> {
    let parsed = Path::parse(path).map_err(ParseError::from)?;
    handle
        .with_tree(|tree| {
            tree.find(&parsed)
                .map(|node| {
                    node.children()
                        .iter()
                        .map(|field| {
                            (
                                field.name().local.clone(),
                                field.text().unwrap_or_default().to_owned(),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
        .await
}
