//! Tonic client for `dingodb.pb.coordinator.CoordinatorService`

use tonic::codegen::*;
use tonic::codegen::http::Uri;

const SERVICE_NAME: &str = "dingodb.pb.coordinator.CoordinatorService";

#[derive(Debug, Clone)]
pub struct CoordinatorServiceClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl CoordinatorServiceClient<tonic::transport::Channel> {
    /// Attempt to create a new client by connecting to a given endpoint.
    pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
    where
        D: TryInto<tonic::transport::Endpoint>,
        D::Error: Into<StdError>,
    {
        let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
        Ok(Self::new(conn))
    }
}

impl<T> CoordinatorServiceClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
{
    pub fn new(inner: T) -> Self {
        let inner = tonic::client::Grpc::new(inner);
        Self { inner }
    }

    pub fn with_origin(inner: T, origin: Uri) -> Self {
        let inner = tonic::client::Grpc::with_origin(inner, origin);
        Self { inner }
    }

    /// Limits the maximum size of a decoded message.
    #[must_use]
    pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
        self.inner = self.inner.max_decoding_message_size(limit);
        self
    }

    pub async fn executor_heartbeat(
        &mut self,
        request: impl tonic::IntoRequest<super::ExecutorHeartbeatRequest>,
    ) -> std::result::Result<tonic::Response<super::ExecutorHeartbeatResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {}", e.into())))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::from_static(
            "/dingodb.pb.coordinator.CoordinatorService/ExecutorHeartbeat",
        );
        let mut req = request.into_request();
        req.extensions_mut()
            .insert(GrpcMethod::new(SERVICE_NAME, "ExecutorHeartbeat"));
        self.inner.unary(req, path, codec).await
    }

    pub async fn get_executor_map(
        &mut self,
        request: impl tonic::IntoRequest<super::GetExecutorMapRequest>,
    ) -> std::result::Result<tonic::Response<super::GetExecutorMapResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {}", e.into())))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::from_static(
            "/dingodb.pb.coordinator.CoordinatorService/GetExecutorMap",
        );
        let mut req = request.into_request();
        req.extensions_mut()
            .insert(GrpcMethod::new(SERVICE_NAME, "GetExecutorMap"));
        self.inner.unary(req, path, codec).await
    }
}
