//! Query facade for application-level lookups.
//!
//! [`ApplicationQuery`] turns a user [`Duration`] into bucket boundaries and
//! forwards the call to storage-backed services. The services are injected
//! through the traits below, so storage access, aggregation and topology
//! assembly stay outside this crate.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    duration::{Duration, DurationBuckets},
    error::FormatError,
    step::Step,
};

/// Error type returned by service implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from [`ApplicationQuery`] handlers.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum QueryError {
    /// The duration could not be converted into buckets.
    #[snafu(display("Invalid query duration: {source}"))]
    InvalidDuration {
        /// Underlying format error, unchanged.
        source: FormatError,
    },

    /// A backing service failed.
    #[snafu(display("{service} service failed: {source}"))]
    Service {
        /// Which service failed.
        service: &'static str,
        /// Error reported by the service.
        source: BoxError,
    },
}

/// An application known to the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Application id.
    pub id: i32,
    /// Application code.
    pub name: String,
    /// Servers reporting for the application in the queried range.
    pub num_of_server: i32,
}

/// A service ranked by response time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetric {
    /// Service id.
    pub id: i32,
    /// Service name.
    pub name: String,
    /// Average response time in milliseconds.
    pub avg_response_time: i32,
    /// Calls per minute.
    pub cpm: i32,
}

/// A server ranked by throughput.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppServerInfo {
    /// Instance id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Calls per minute.
    pub cpm: i32,
}

/// Node of an application topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// Node id.
    pub id: i32,
    /// Node name.
    pub name: String,
    /// Node kind as reported by the topology service.
    pub kind: String,
}

/// Edge of an application topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyCall {
    /// Caller node id.
    pub source: i32,
    /// Callee node id.
    pub target: i32,
    /// Calls per minute on this edge.
    pub cpm: i32,
}

/// Topology as assembled by an [`ApplicationTopologyService`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Nodes.
    pub nodes: Vec<TopologyNode>,
    /// Edges.
    pub calls: Vec<TopologyCall>,
}

/// Application lookups backed by storage.
#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Applications active within `[start_second_bucket, end_second_bucket]`.
    async fn get_applications(
        &self,
        start_second_bucket: i64,
        end_second_bucket: i64,
    ) -> Result<Vec<Application>, BoxError>;

    /// Slowest services of `application_id` in the bucket range.
    async fn get_slow_services(
        &self,
        application_id: i32,
        step: Step,
        buckets: DurationBuckets,
        top_n: i32,
    ) -> Result<Vec<ServiceMetric>, BoxError>;
}

/// Server lookups backed by storage.
#[async_trait]
pub trait ServerService: Send + Sync {
    /// Servers of `application_id` with the highest throughput in the range.
    async fn get_server_throughput(
        &self,
        application_id: i32,
        step: Step,
        buckets: DurationBuckets,
        top_n: i32,
    ) -> Result<Vec<AppServerInfo>, BoxError>;
}

/// Topology assembly backed by storage.
#[async_trait]
pub trait ApplicationTopologyService: Send + Sync {
    /// Topology around `application_id` in the range.
    async fn get_application_topology(
        &self,
        step: Step,
        application_id: i32,
        buckets: DurationBuckets,
    ) -> Result<Topology, BoxError>;
}

/// Converts durations and forwards application queries to the injected
/// services.
#[derive(Debug, Clone)]
pub struct ApplicationQuery<A, S, T> {
    application_service: A,
    server_service: S,
    topology_service: T,
}

impl<A, S, T> ApplicationQuery<A, S, T>
where
    A: ApplicationService,
    S: ServerService,
    T: ApplicationTopologyService,
{
    /// Build a facade over the given services.
    pub fn new(application_service: A, server_service: S, topology_service: T) -> Self {
        Self {
            application_service,
            server_service,
            topology_service,
        }
    }

    fn buckets(duration: &Duration) -> Result<DurationBuckets, QueryError> {
        duration.to_time_buckets().context(InvalidDurationSnafu)
    }

    /// All applications seen within `duration`.
    ///
    /// # Errors
    /// [`QueryError::InvalidDuration`] for a malformed duration,
    /// [`QueryError::Service`] if the application service fails.
    pub async fn get_all_applications(
        &self,
        duration: &Duration,
    ) -> Result<Vec<Application>, QueryError> {
        let b = Self::buckets(duration)?;
        debug!(
            "get_applications: second buckets [{}, {}]",
            b.start_second_bucket, b.end_second_bucket
        );

        self.application_service
            .get_applications(b.start_second_bucket, b.end_second_bucket)
            .await
            .context(ServiceSnafu {
                service: "application",
            })
    }

    /// Top `top_n` slowest services of `application_id` within `duration`.
    ///
    /// # Errors
    /// See [`ApplicationQuery::get_all_applications`].
    pub async fn get_slow_services(
        &self,
        application_id: i32,
        duration: &Duration,
        top_n: i32,
    ) -> Result<Vec<ServiceMetric>, QueryError> {
        let b = Self::buckets(duration)?;
        debug!("get_slow_services: application={application_id} top_n={top_n} buckets={b:?}");

        self.application_service
            .get_slow_services(application_id, duration.step(), b, top_n)
            .await
            .context(ServiceSnafu {
                service: "application",
            })
    }

    /// Top `top_n` servers of `application_id` by throughput within
    /// `duration`.
    ///
    /// # Errors
    /// See [`ApplicationQuery::get_all_applications`].
    pub async fn get_server_throughput(
        &self,
        application_id: i32,
        duration: &Duration,
        top_n: i32,
    ) -> Result<Vec<AppServerInfo>, QueryError> {
        let b = Self::buckets(duration)?;
        debug!("get_server_throughput: application={application_id} top_n={top_n} buckets={b:?}");

        self.server_service
            .get_server_throughput(application_id, duration.step(), b, top_n)
            .await
            .context(ServiceSnafu { service: "server" })
    }

    /// Topology around `application_id` within `duration`.
    ///
    /// # Errors
    /// See [`ApplicationQuery::get_all_applications`].
    pub async fn get_application_topology(
        &self,
        application_id: i32,
        duration: &Duration,
    ) -> Result<Topology, QueryError> {
        let b = Self::buckets(duration)?;
        debug!("get_application_topology: application={application_id} buckets={b:?}");

        self.topology_service
            .get_application_topology(duration.step(), application_id, b)
            .await
            .context(ServiceSnafu {
                service: "application topology",
            })
    }
}
