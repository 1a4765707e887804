//! Coordinator wire messages
//!
//! Prost definitions for `proto/coordinator.proto`. Field tags must stay in
//! sync with the proto file.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EntityType {
    Schema = 0,
    Table = 1,
    Part = 2,
    Index = 3,
}

impl EntityType {
    /// Name as written in the proto definition
    pub fn as_str_name(&self) -> &'static str {
        match self {
            EntityType::Schema => "ENTITY_TYPE_SCHEMA",
            EntityType::Table => "ENTITY_TYPE_TABLE",
            EntityType::Part => "ENTITY_TYPE_PART",
            EntityType::Index => "ENTITY_TYPE_INDEX",
        }
    }

    /// Look up a variant by its proto name
    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "ENTITY_TYPE_SCHEMA" => Some(Self::Schema),
            "ENTITY_TYPE_TABLE" => Some(Self::Table),
            "ENTITY_TYPE_PART" => Some(Self::Part),
            "ENTITY_TYPE_INDEX" => Some(Self::Index),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ExecutorState {
    ExecutorNew = 0,
    ExecutorNormal = 1,
    ExecutorOffline = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DingoCommonId {
    #[prost(enumeration = "EntityType", tag = "1")]
    pub entity_type: i32,
    #[prost(int64, tag = "2")]
    pub parent_entity_id: i64,
    #[prost(int64, tag = "3")]
    pub entity_id: i64,
}

/// Error embedded in coordinator responses; `errcode == 0` means success
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    #[prost(int32, tag = "1")]
    pub errcode: i32,
    #[prost(string, tag = "2")]
    pub errmsg: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Location {
    #[prost(string, tag = "1")]
    pub host: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub port: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecutorUser {
    #[prost(string, tag = "1")]
    pub user: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub keyring: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Executor {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub server_location: ::core::option::Option<Location>,
    #[prost(message, optional, tag = "3")]
    pub executor_user: ::core::option::Option<ExecutorUser>,
    #[prost(enumeration = "ExecutorState", tag = "4")]
    pub state: i32,
    #[prost(uint64, tag = "5")]
    pub create_timestamp: u64,
    #[prost(uint64, tag = "6")]
    pub last_seen_timestamp: u64,
    #[prost(string, tag = "7")]
    pub cluster_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecutorMap {
    #[prost(int64, tag = "1")]
    pub epoch: i64,
    #[prost(message, repeated, tag = "2")]
    pub executors: ::prost::alloc::vec::Vec<Executor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecutorHeartbeatRequest {
    #[prost(int64, tag = "1")]
    pub self_executormap_epoch: i64,
    #[prost(message, optional, tag = "2")]
    pub executor: ::core::option::Option<Executor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecutorHeartbeatResponse {
    #[prost(message, optional, tag = "1")]
    pub error: ::core::option::Option<Error>,
    #[prost(int64, tag = "2")]
    pub executormap_epoch: i64,
    #[prost(message, optional, tag = "3")]
    pub executormap: ::core::option::Option<ExecutorMap>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetExecutorMapRequest {
    #[prost(int64, tag = "1")]
    pub epoch: i64,
    #[prost(string, tag = "2")]
    pub cluster_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetExecutorMapResponse {
    #[prost(message, optional, tag = "1")]
    pub error: ::core::option::Option<Error>,
    #[prost(message, optional, tag = "2")]
    pub executormap: ::core::option::Option<ExecutorMap>,
}
