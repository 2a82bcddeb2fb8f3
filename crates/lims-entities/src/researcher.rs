//! Researchers (users and clients).

use lims_core::LimsError;

use crate::{
    externalid::HasExternalIds,
    lab::Lab,
    macros::{boolean_fields, lims_entity, reference_fields, string_fields},
    udf::UdfContainer,
};

lims_entity! {
    /// A person: a client submitting work or a user running it.
    Researcher, "Researcher", "researchers", "res": "researcher"
}

impl Researcher {
    string_fields! {
        first_name, set_first_name => "first-name";
        last_name, set_last_name => "last-name";
        phone, set_phone => "phone";
        fax, set_fax => "fax";
        email, set_email => "email";
        /// Initials used to label records in the UI.
        initials, set_initials => "initials";
        /// Login name, present only for researchers with system access.
        username => "credentials/username";
    }

    boolean_fields! {
        account_locked => "credentials/account-locked";
    }

    reference_fields! {
        /// The lab this researcher belongs to.
        lab, set_lab => ("lab", Lab);
    }

    /// Full name, `"first last"` with absent parts omitted.
    pub async fn name(&self) -> Result<String, LimsError> {
        let first = self.first_name().await?.unwrap_or_default();
        let last = self.last_name().await?.unwrap_or_default();
        Ok(format!("{first} {last}").trim().to_owned())
    }
}

impl UdfContainer for Researcher {}
impl HasExternalIds for Researcher {}
