use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata fields kept from a cleaned complaint row.
///
/// Every field is optional: the source data is sparse and the cleaning
/// pipeline never invents values. Use [`ComplaintMetadata::display`] when a
/// field has to be rendered; it maps a missing value to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_public_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timely: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_received: Option<NaiveDate>,
}

/// Names of the string metadata fields, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Company,
    Product,
    SubProduct,
    Issue,
    SubIssue,
    State,
    ZipCode,
    CompanyResponse,
    CompanyPublicResponse,
    Timely,
}

impl MetadataField {
    pub const ALL: [MetadataField; 10] = [
        MetadataField::Company,
        MetadataField::Product,
        MetadataField::SubProduct,
        MetadataField::Issue,
        MetadataField::SubIssue,
        MetadataField::State,
        MetadataField::ZipCode,
        MetadataField::CompanyResponse,
        MetadataField::CompanyPublicResponse,
        MetadataField::Timely,
    ];

    /// Normalized column name this field is read from.
    pub fn column(&self) -> &'static str {
        match self {
            MetadataField::Company => "company",
            MetadataField::Product => "product",
            MetadataField::SubProduct => "sub_product",
            MetadataField::Issue => "issue",
            MetadataField::SubIssue => "sub_issue",
            MetadataField::State => "state",
            MetadataField::ZipCode => "zip_code",
            MetadataField::CompanyResponse => "company_response",
            MetadataField::CompanyPublicResponse => "company_public_response",
            MetadataField::Timely => "timely",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == column)
    }
}

impl ComplaintMetadata {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        let value = match field {
            MetadataField::Company => &self.company,
            MetadataField::Product => &self.product,
            MetadataField::SubProduct => &self.sub_product,
            MetadataField::Issue => &self.issue,
            MetadataField::SubIssue => &self.sub_issue,
            MetadataField::State => &self.state,
            MetadataField::ZipCode => &self.zip_code,
            MetadataField::CompanyResponse => &self.company_response,
            MetadataField::CompanyPublicResponse => &self.company_public_response,
            MetadataField::Timely => &self.timely,
        };
        value.as_deref()
    }

    pub fn set(&mut self, field: MetadataField, value: Option<String>) {
        let slot = match field {
            MetadataField::Company => &mut self.company,
            MetadataField::Product => &mut self.product,
            MetadataField::SubProduct => &mut self.sub_product,
            MetadataField::Issue => &mut self.issue,
            MetadataField::SubIssue => &mut self.sub_issue,
            MetadataField::State => &mut self.state,
            MetadataField::ZipCode => &mut self.zip_code,
            MetadataField::CompanyResponse => &mut self.company_response,
            MetadataField::CompanyPublicResponse => &mut self.company_public_response,
            MetadataField::Timely => &mut self.timely,
        };
        *slot = value;
    }

    /// Field value for rendering. Missing values render as "".
    pub fn display(&self, field: MetadataField) -> &str {
        self.get(field).unwrap_or_default()
    }
}

/// A single cleaned complaint.
///
/// `position` is the row's place in the corpus it was loaded from and is
/// what search results use to break score ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub position: usize,
    pub narrative: String,
    #[serde(flatten)]
    pub metadata: ComplaintMetadata,
}

impl Record {
    pub fn new(position: usize, narrative: impl Into<String>) -> Self {
        Self {
            position,
            narrative: narrative.into(),
            metadata: ComplaintMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ComplaintMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn has_narrative(&self) -> bool {
        !self.narrative.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_defaults_to_empty() {
        let metadata = ComplaintMetadata {
            company: Some("Acme Bank".to_string()),
            ..Default::default()
        };

        assert_eq!(metadata.display(MetadataField::Company), "Acme Bank");
        assert_eq!(metadata.display(MetadataField::Issue), "");
        assert!(metadata.get(MetadataField::Issue).is_none());
    }

    #[test]
    fn test_set_and_get_every_field() {
        let mut metadata = ComplaintMetadata::default();
        for field in MetadataField::ALL {
            metadata.set(field, Some(field.column().to_uppercase()));
        }
        for field in MetadataField::ALL {
            assert_eq!(metadata.get(field), Some(field.column().to_uppercase().as_str()));
        }
    }

    #[test]
    fn test_from_column() {
        assert_eq!(MetadataField::from_column("zip_code"), Some(MetadataField::ZipCode));
        assert_eq!(MetadataField::from_column("ZIP code"), None);
        assert_eq!(MetadataField::from_column("date_received"), None);
    }

    #[test]
    fn test_has_narrative() {
        assert!(Record::new(0, "lost my card").has_narrative());
        assert!(!Record::new(1, "   ").has_narrative());
        assert!(!Record::new(2, "").has_narrative());
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record::new(3, "text").with_metadata(ComplaintMetadata {
            company: Some("B".to_string()),
            ..Default::default()
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["company"], "B");
        assert_eq!(json["position"], 3);
        assert!(json.get("product").is_none());
    }
}
