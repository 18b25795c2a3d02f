//! Proto message <-> domain model conversions.
//!
//! Empty proto strings are absent values; ids travel as UUID strings.

use grpc_helpers::conversions::{optional_text, parse_optional_uuid, parse_uuid, text_or_empty};
use rpc::customer as pb;
use tonic::Status;

use crate::models::{
    Contact, Customer, CustomerDetail, CustomerFilter, NewContact, NewCustomer, NewStaff,
};

impl TryFrom<pb::CreateCustomerRequest> for NewCustomer {
    type Error = Status;

    fn try_from(req: pb::CreateCustomerRequest) -> Result<Self, Self::Error> {
        let contact = req.contact.unwrap_or_default();

        Ok(Self {
            book_id: parse_uuid("book_id", &req.book_id)?,
            name: req.name,
            job: optional_text(req.job),
            corporation: optional_text(req.corporation),
            address: optional_text(req.address),
            memo: optional_text(req.memo),
            contact: NewContact {
                phone: contact.phone,
                mail: optional_text(contact.mail),
                fax: optional_text(contact.fax),
            },
            leader: NewStaff {
                name: optional_text(req.leader),
                sex: optional_text(req.leader_sex),
            },
            pic: NewStaff {
                name: optional_text(req.pic),
                sex: optional_text(req.pic_sex),
            },
        })
    }
}

impl TryFrom<pb::SearchCustomerRequest> for CustomerFilter {
    type Error = Status;

    fn try_from(req: pb::SearchCustomerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            book_id: parse_optional_uuid("book_id", &req.book_id)?,
            name: optional_text(req.name),
            corporation: optional_text(req.corporation),
            address: optional_text(req.address),
            memo: optional_text(req.memo),
        })
    }
}

impl From<Customer> for pb::Customer {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            book_id: customer.book_id.to_string(),
            name: customer.name,
            job: text_or_empty(customer.job),
            corporation: text_or_empty(customer.corporation),
            address: text_or_empty(customer.address),
            memo: text_or_empty(customer.memo),
        }
    }
}

impl From<Customer> for pb::CreateCustomerResponse {
    fn from(customer: Customer) -> Self {
        let pb::Customer {
            id,
            book_id,
            name,
            job,
            corporation,
            address,
            memo,
        } = customer.into();

        Self {
            id,
            book_id,
            name,
            job,
            corporation,
            address,
            memo,
        }
    }
}

impl From<Contact> for pb::Contact {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            phone: contact.phone,
            mail: text_or_empty(contact.mail),
            fax: text_or_empty(contact.fax),
        }
    }
}

impl From<CustomerDetail> for pb::GetCustomerResponse {
    fn from(detail: CustomerDetail) -> Self {
        let customer = detail.customer;
        let contact: Option<pb::Contact> = detail.contact.map(Into::into);
        // Flat contact fields mirror the nested message
        let flat = contact.clone().unwrap_or_default();

        Self {
            id: customer.id.to_string(),
            book_id: customer.book_id.to_string(),
            name: customer.name,
            job: text_or_empty(customer.job),
            corporation: text_or_empty(customer.corporation),
            address: text_or_empty(customer.address),
            phone: flat.phone,
            mail: flat.mail,
            fax: flat.fax,
            memo: text_or_empty(customer.memo),
            contact,
        }
    }
}
