//! `customer.v1.CustomerService` implementation shared by the gRPC server and
//! the HTTP gateway.

use std::sync::Arc;

use email::{SendConfirmationEmail, TaskDistributor};
use grpc_helpers::conversions::parse_uuid;
use grpc_helpers::{ToTonicOption, ToTonicResult};
use rpc::customer::customer_service_server::CustomerService;
use rpc::customer::{
    CreateCustomerRequest, CreateCustomerResponse, GetCustomerByBookIdRequest,
    GetCustomerByBookIdResponse, GetCustomerRequest, GetCustomerResponse, SearchCustomerRequest,
    SearchCustomerResponse,
};
use tonic::{Request, Response, Status};
use tracing::{instrument, warn};

use crate::models::{Customer, CustomerFilter, NewCustomer, Page};
use crate::repository::CustomerRepository;

/// Stateless customer service over a [`CustomerRepository`].
///
/// With a distributor attached, creating a customer whose contact has a mail
/// address also enqueues a confirmation e-mail.
pub struct CustomerServer<R: CustomerRepository> {
    repository: Arc<R>,
    distributor: Option<Arc<dyn TaskDistributor>>,
}

impl<R: CustomerRepository> CustomerServer<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            distributor: None,
        }
    }

    pub fn with_distributor(mut self, distributor: Arc<dyn TaskDistributor>) -> Self {
        self.distributor = Some(distributor);
        self
    }

    /// Enqueue failures are logged; the customer already exists.
    async fn send_confirmation(&self, customer: &Customer, mail: Option<String>) {
        let (Some(distributor), Some(mail)) = (&self.distributor, mail) else {
            return;
        };

        let task = SendConfirmationEmail {
            customer_id: customer.id.to_string(),
            customer_name: customer.name.clone(),
            mail,
        };
        if let Err(e) = distributor.distribute_send_confirmation_email(task).await {
            warn!(customer_id = %customer.id, error = %e, "Failed to distribute confirmation e-mail");
        }
    }
}

#[tonic::async_trait]
impl<R: CustomerRepository> CustomerService for CustomerServer<R> {
    #[instrument(skip_all, fields(book_id = %request.get_ref().book_id))]
    async fn create_customer(
        &self,
        request: Request<CreateCustomerRequest>,
    ) -> Result<Response<CreateCustomerResponse>, Status> {
        let input = NewCustomer::try_from(request.into_inner())?
            .validated()
            .map_err(Status::from)?;
        let mail = input.contact.mail.clone();

        let customer = self.repository.create(input).await?;
        self.send_confirmation(&customer, mail).await;

        Ok(Response::new(customer.into()))
    }

    async fn search_customer(
        &self,
        request: Request<SearchCustomerRequest>,
    ) -> Result<Response<SearchCustomerResponse>, Status> {
        let filter = CustomerFilter::try_from(request.into_inner())?;
        let customers = self.repository.search(filter).await?;

        Ok(Response::new(SearchCustomerResponse {
            customers: customers.into_iter().map(Into::into).collect(),
        }))
    }

    #[instrument(skip_all, fields(customer_id = %request.get_ref().id))]
    async fn get_customer(
        &self,
        request: Request<GetCustomerRequest>,
    ) -> Result<Response<GetCustomerResponse>, Status> {
        let id = parse_uuid("id", &request.into_inner().id)?;
        let detail = self
            .repository
            .get_detail(id)
            .await?
            .ok_or_not_found(format!("customer {id} not found"))?;

        Ok(Response::new(detail.into()))
    }

    async fn get_customer_by_book_id(
        &self,
        request: Request<GetCustomerByBookIdRequest>,
    ) -> Result<Response<GetCustomerByBookIdResponse>, Status> {
        let req = request.into_inner();
        let book_id = parse_uuid("book_id", &req.book_id)?;
        let page = Page::new(req.limit, req.page).to_tonic()?;

        let customers = self.repository.list_by_book(book_id, page).await?;

        Ok(Response::new(GetCustomerByBookIdResponse {
            customers: customers.into_iter().map(Into::into).collect(),
        }))
    }
}
