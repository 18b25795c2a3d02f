use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DataError, DataResult};

/// A customer entry of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub book_id: Uuid,
    pub name: String,
    pub job: Option<String>,
    pub corporation: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
    pub leader_id: Option<Uuid>,
    pub pic_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub phone: String,
    pub mail: Option<String>,
    pub fax: Option<String>,
}

/// A leader or person in charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub name: Option<String>,
    pub sex: Option<String>,
}

/// A customer together with its primary contact
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub contact: Option<Contact>,
}

/// Everything written when a customer is created
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewCustomer {
    pub book_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    pub job: Option<String>,
    pub corporation: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
    #[validate(nested)]
    pub contact: NewContact,
    pub leader: NewStaff,
    pub pic: NewStaff,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct NewContact {
    pub phone: String,
    #[validate(email(message = "mail must be an e-mail address"))]
    pub mail: Option<String>,
    pub fax: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStaff {
    pub name: Option<String>,
    pub sex: Option<String>,
}

impl NewStaff {
    /// Nothing to store when neither name nor sex was given.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sex.is_none()
    }
}

impl NewCustomer {
    pub fn validated(self) -> DataResult<Self> {
        self.validate()
            .map_err(|e| DataError::Validation(e.to_string()))?;
        Ok(self)
    }
}

/// Search criteria. `None` fields do not filter; text fields match substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub book_id: Option<Uuid>,
    pub name: Option<String>,
    pub corporation: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
}

/// Zero-based page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 50;

    /// A `limit` of zero or less means the default; `page` counts from zero.
    pub fn new(limit: i32, page: i32) -> DataResult<Self> {
        if page < 0 {
            return Err(DataError::Validation("page must not be negative".into()));
        }

        let limit = if limit <= 0 {
            Self::DEFAULT_LIMIT
        } else {
            limit as u64
        };
        Ok(Self {
            limit,
            offset: page as u64 * limit,
        })
    }
}
