pub mod test_response;

pub use test_client::{TestClient, TestRequestBuilder};
pub use test_response::TestResponse;
