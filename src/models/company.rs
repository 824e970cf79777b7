use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserInfo};
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, require_url, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sponsorship {
    Main,
    Gold,
    Silver,
    Bronze,
}

impl Sponsorship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sponsorship::Main => "MAIN",
            Sponsorship::Gold => "GOLD",
            Sponsorship::Silver => "SILVER",
            Sponsorship::Bronze => "BRONZE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "companyID")]
    pub company_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub company_name: String,
    pub description: String,
    pub sponsership: Sponsorship,
    pub contact_person_name: String,
    pub contact_person_designation: String,
    pub contact_number: String,
    pub logo: Option<String>,
    pub location: String,
    pub company_website: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyDetails {
    #[serde(flatten)]
    pub company: Company,
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyName {
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileRequest {
    pub company_name: String,
    pub description: String,
    pub sponsership: Sponsorship,
    pub contact_person_name: String,
    pub contact_person_designation: String,
    pub contact_number: String,
    pub logo: Option<String>,
    pub location: String,
    pub company_website: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    pub user: CreateUserRequest,
    pub company: CompanyProfileRequest,
}

impl Validate for CreateCompanyRequest {
    fn validate(&self) -> Result<(), AppError> {
        self.user.validate()?;
        let company = &self.company;
        require_non_empty("companyName", &company.company_name)?;
        require_non_empty("description", &company.description)?;
        require_non_empty("contactPersonName", &company.contact_person_name)?;
        require_non_empty("contactPersonDesignation", &company.contact_person_designation)?;
        require_non_empty("contactNumber", &company.contact_number)?;
        require_non_empty("location", &company.location)?;
        if let Some(logo) = &company.logo {
            require_url("logo", logo)?;
        }
        if let Some(website) = &company.company_website {
            require_url("companyWebsite", website)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub sponsership: Option<Sponsorship>,
    pub contact_person_name: Option<String>,
    pub contact_person_designation: Option<String>,
    pub contact_number: Option<String>,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub company_website: Option<String>,
    pub user: Option<UpdateUserRequest>,
}

impl Validate for UpdateCompanyRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("companyName", self.company_name.as_deref())?;
        optional_non_empty("contactNumber", self.contact_number.as_deref())?;
        if let Some(logo) = &self.logo {
            require_url("logo", logo)?;
        }
        if let Some(website) = &self.company_website {
            require_url("companyWebsite", website)?;
        }
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }
}

impl UpdateCompanyRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        let text_fields = [
            ("companyName", &self.company_name),
            ("description", &self.description),
            ("contactPersonName", &self.contact_person_name),
            ("contactPersonDesignation", &self.contact_person_designation),
            ("contactNumber", &self.contact_number),
            ("logo", &self.logo),
            ("location", &self.location),
            ("companyWebsite", &self.company_website),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                set.insert(key, value);
            }
        }
        if let Some(sponsership) = self.sponsership {
            set.insert("sponsership", sponsership.as_str());
        }
        set
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CompanyFilterQuery {
    pub location: Option<String>,
    pub sponsership: Option<Sponsorship>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_sponsorship_wire_names() {
        assert_eq!(serde_json::to_value(Sponsorship::Gold).unwrap(), "GOLD");
        let tier: Sponsorship = serde_json::from_str("\"MAIN\"").unwrap();
        assert_eq!(tier, Sponsorship::Main);
    }

    #[test]
    fn test_create_request_from_json() {
        let body = serde_json::json!({
            "user": {
                "email": "hr@acme.io",
                "password": "secret123",
                "first_name": "Acme",
                "last_name": "HR"
            },
            "company": {
                "companyName": "Acme",
                "description": "Widgets",
                "sponsership": "SILVER",
                "contactPersonName": "Jane",
                "contactPersonDesignation": "Recruiter",
                "contactNumber": "0112345678",
                "location": "Colombo",
                "companyWebsite": "https://acme.io"
            }
        });
        let request: CreateCompanyRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.company.sponsership, Sponsorship::Silver);
        assert!(request.company.logo.is_none());
    }

    #[test]
    fn test_bad_website_is_rejected() {
        let update = UpdateCompanyRequest {
            company_website: Some("acme".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_doc_only_has_supplied_fields() {
        let update = UpdateCompanyRequest {
            location: Some("Kandy".into()),
            sponsership: Some(Sponsorship::Bronze),
            ..Default::default()
        };
        assert_eq!(
            update.to_set_doc(),
            doc! { "location": "Kandy", "sponsership": "BRONZE" }
        );
    }
}
