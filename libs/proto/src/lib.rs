//! # bridge-proto
//!
//! Protobuf wire schemas for the allocator bridge. The configurator encodes
//! these messages and ships them as the opaque `value` field of a multipart
//! hook request; the bridge decodes them with [`prost::Message::decode`].
//!
//! Schemas are declared with prost derive attributes rather than generated
//! from `.proto` files, so the crate builds without a protoc toolchain. Tag
//! numbers are part of the wire contract and must not be reordered.

/// A single key/value label attached to a task or executor.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Label {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, optional, tag = "2")]
    pub value: Option<String>,
}

/// An ordered collection of labels.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Labels {
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<Label>,
}

/// One environment variable of an executor environment.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Variable {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// The full environment handed to launched executors.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Environment {
    #[prost(message, repeated, tag = "1")]
    pub variables: Vec<Variable>,
}

/// One named scalar resource quantity (e.g. `cpus: 2.0`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Resource {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(double, tag = "2")]
    pub value: f64,
}

/// Identity of a slave node.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SlaveId {
    #[prost(string, tag = "1")]
    pub value: String,
}

/// Identity of a framework (workload tenant).
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct FrameworkId {
    #[prost(string, tag = "1")]
    pub value: String,
}

/// Static description of a slave node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SlaveInfo {
    #[prost(string, tag = "1")]
    pub hostname: String,
    #[prost(int32, optional, tag = "2")]
    pub port: Option<i32>,
    #[prost(message, repeated, tag = "3")]
    pub attributes: Vec<Label>,
}

/// Resources already in use on a slave by one framework.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FrameworkResources {
    #[prost(message, optional, tag = "1")]
    pub framework_id: Option<FrameworkId>,
    #[prost(message, repeated, tag = "2")]
    pub resources: Vec<Resource>,
}

/// Snapshot of a slave joining the allocator: its identity, static info,
/// total resource vector, and the per-framework resources already consumed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddSlave {
    #[prost(message, optional, tag = "1")]
    pub slave_id: Option<SlaveId>,
    #[prost(message, optional, tag = "2")]
    pub slave_info: Option<SlaveInfo>,
    #[prost(message, repeated, tag = "3")]
    pub total: Vec<Resource>,
    #[prost(message, repeated, tag = "4")]
    pub framework_resources: Vec<FrameworkResources>,
}
