use std::sync::Arc;

use grpc_helpers::ServerConfig;
use rpc::customer::customer_service_server::{CustomerService, CustomerServiceServer, SERVICE_NAME};
use tonic::codec::CompressionEncoding;
use tonic::service::Routes;

/// Services reported by the health endpoint
pub const SERVICES: &[&str] = &[SERVICE_NAME];

/// The customer service with the configured message limits and compression.
pub fn routes<S: CustomerService>(service: Arc<S>, config: &ServerConfig) -> Routes {
    let mut server = CustomerServiceServer::from_arc(service)
        .max_decoding_message_size(config.max_decoding_message_size)
        .max_encoding_message_size(config.max_encoding_message_size);

    if config.enable_compression {
        server = server
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    Routes::new(server)
}
