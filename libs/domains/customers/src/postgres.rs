use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use database::postgres::DatabaseConnection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{contact, customer, staff};
use crate::error::DataResult;
use crate::models::{Customer, CustomerDetail, CustomerFilter, NewCustomer, NewStaff, Page};
use crate::repository::CustomerRepository;

/// PostgreSQL implementation of [`CustomerRepository`]
#[derive(Clone)]
pub struct PgCustomerRepository {
    db: DatabaseConnection,
}

impl PgCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

async fn insert_staff<C>(conn: &C, input: NewStaff) -> DataResult<Option<Uuid>>
where
    C: ConnectionTrait,
{
    if input.is_empty() {
        return Ok(None);
    }

    let model = staff::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(input.name),
        sex: Set(input.sex),
    }
    .insert(conn)
    .await?;

    Ok(Some(model.id))
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, input: NewCustomer) -> DataResult<Customer> {
        let txn = self.db.begin().await?;

        let leader_id = insert_staff(&txn, input.leader).await?;
        let pic_id = insert_staff(&txn, input.pic).await?;

        let model = customer::ActiveModel {
            id: Set(Uuid::now_v7()),
            book_id: Set(input.book_id),
            name: Set(input.name),
            job: Set(input.job),
            corporation: Set(input.corporation),
            address: Set(input.address),
            memo: Set(input.memo),
            leader_id: Set(leader_id),
            pic_id: Set(pic_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        contact::ActiveModel {
            id: Set(Uuid::now_v7()),
            customer_id: Set(model.id),
            phone: Set(input.contact.phone),
            mail: Set(input.contact.mail),
            fax: Set(input.contact.fax),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(customer_id = %model.id, book_id = %model.book_id, "Created customer");
        Ok(model.into())
    }

    async fn search(&self, filter: CustomerFilter) -> DataResult<Vec<Customer>> {
        let mut query = customer::Entity::find();

        if let Some(book_id) = filter.book_id {
            query = query.filter(customer::Column::BookId.eq(book_id));
        }
        if let Some(name) = filter.name {
            query = query.filter(customer::Column::Name.contains(name));
        }
        if let Some(corporation) = filter.corporation {
            query = query.filter(customer::Column::Corporation.contains(corporation));
        }
        if let Some(address) = filter.address {
            query = query.filter(customer::Column::Address.contains(address));
        }
        if let Some(memo) = filter.memo {
            query = query.filter(customer::Column::Memo.contains(memo));
        }

        let models = query
            .order_by_asc(customer::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_detail(&self, id: Uuid) -> DataResult<Option<CustomerDetail>> {
        let Some(model) = customer::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        // First contact written for the customer is the primary one
        let contact = contact::Entity::find()
            .filter(contact::Column::CustomerId.eq(id))
            .order_by_asc(contact::Column::Id)
            .one(&self.db)
            .await?;

        Ok(Some(CustomerDetail {
            customer: model.into(),
            contact: contact.map(Into::into),
        }))
    }

    async fn list_by_book(&self, book_id: Uuid, page: Page) -> DataResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .filter(customer::Column::BookId.eq(book_id))
            .order_by_asc(customer::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
