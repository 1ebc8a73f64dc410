//! MDTO metadata records (Metagegevens voor Duurzaam Toegankelijke Overheidsinformatie).
//!
//! Every field has a default, so a null or missing nested object decodes as
//! an empty record rather than failing. Tree keys keep their MDTO spelling.

use chronicle_model::{CodecResult, FieldDescriptor, FieldValues, Record, RecordSchema};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Declares a record whose fields all default, with an explicit tree key per field.
macro_rules! mdto_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($field:ident: $ty:ty => $key:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl Record for $name {
            fn schema() -> &'static RecordSchema {
                static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
                SCHEMA.get_or_init(|| {
                    RecordSchema::builder(stringify!($name))
                        $(.field(FieldDescriptor::defaulted::<$ty>($key)))*
                        .build()
                })
            }

            fn to_fields(&self) -> FieldValues {
                FieldValues::new()$(.with($key, &self.$field))*
            }

            fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
                Ok(Self {
                    $($field: fields.take_or_default($key)?,)*
                })
            }
        }
    };
}

mdto_record! {
    Informatietype {
        label: Option<String> => "label",
        uri: Option<String> => "uri",
    }
}

mdto_record! {
    ParlementairType {
        label: Option<String> => "label",
        uri: Option<String> => "uri",
    }
}

mdto_record! {
    Taal {
        label: Option<String> => "label",
        uri: Option<String> => "uri",
    }
}

mdto_record! {
    OrganisatieType {
        label: Option<String> => "label",
        uri: Option<String> => "uri",
    }
}

mdto_record! {
    /// The publishing organisation.
    Organisatie {
        naam: Option<String> => "naam",
        organisatie_type: OrganisatieType => "organisatieType",
        uri: Option<String> => "uri",
    }
}

mdto_record! {
    Relatie {
        target_identificatie: Option<String> => "targetIdentificatie",
    }
}

mdto_record! {
    /// A file belonging to an information object.
    Bestand {
        weergave_url: Option<String> => "weergaveURL",
        document_url: Option<String> => "documentURL",
        bestandsformaat: Option<BTreeMap<String, String>> => "bestandsformaat",
    }
}

mdto_record! {
    TechnischeContext {
        configuratie_schema: Option<String> => "configuratieSchema",
        doctype: Option<String> => "doctype",
    }
}

mdto_record! {
    /// Descriptive metadata of one parliamentary document.
    Informatieobject {
        identificatie: Option<String> => "identificatie",
        titel: Option<String> => "titel",
        status: Option<String> => "status",
        informatietype: Informatietype => "informatietype",
        parlementair_type: ParlementairType => "parlementairType",
        dossier_nummer: Option<String> => "dossierNummer",
        ondernummer: Option<String> => "ondernummer",
        vergaderjaar: Option<String> => "vergaderjaar",
        taal: Taal => "taal",
        beschikbaar_vanaf: Option<String> => "beschikbaarVanaf",
        organisatie: Organisatie => "organisatie",
        relaties: Vec<Relatie> => "relaties",
        bestanden: Vec<Bestand> => "bestanden",
        technische_context: TechnischeContext => "technischeContext",
    }
}

mdto_record! {
    /// Root of an MDTO metadata document.
    Mdto {
        informatieobject: Informatieobject => "informatieobject",
    }
}
