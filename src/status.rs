//! Identifiers and status values shared by every wait.

use std::fmt;
use std::ops::Deref;

macro_rules! newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Wraps the given value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the wrapped value as a string slice.
            #[must_use]
            pub const fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

newtype!(
    /// Status string reported by the Power Cloud API (for example `ACTIVE`).
    ///
    /// Comparison is exact and case sensitive: the API mixes `ACTIVE` with
    /// `available`, and the presets spell each one the way it is reported.
    Status
);
newtype!(
    /// Power Virtual Server workspace (cloud instance) identifier.
    CloudInstanceId
);
newtype!(
    /// Identifier of the awaited resource within a workspace.
    ResourceId
);

/// Status reported by absence waits once the resource is gone.
pub const STATUS_NOT_FOUND: &str = "Not Found";

/// Composite key identifying the remote object being awaited.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PollTarget {
    cloud_instance_id: CloudInstanceId,
    resource_id: ResourceId,
    sub_resource_id: Option<ResourceId>,
}

impl PollTarget {
    /// Creates a target for a resource directly owned by a workspace.
    #[must_use]
    pub fn new(
        cloud_instance_id: impl Into<CloudInstanceId>,
        resource_id: impl Into<ResourceId>,
    ) -> Self {
        Self {
            cloud_instance_id: cloud_instance_id.into(),
            resource_id: resource_id.into(),
            sub_resource_id: None,
        }
    }

    /// Narrows the target to a sub-resource (for example a security group
    /// member or a port on a network).
    #[must_use]
    pub fn with_sub_resource(mut self, sub_resource_id: impl Into<ResourceId>) -> Self {
        self.sub_resource_id = Some(sub_resource_id.into());
        self
    }

    /// Identifier of the awaited resource.
    #[must_use]
    pub const fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Optional sub-resource identifier.
    #[must_use]
    pub const fn sub_resource_id(&self) -> Option<&ResourceId> {
        self.sub_resource_id.as_ref()
    }
}

impl fmt::Display for PollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cloud_instance_id, self.resource_id)?;
        if let Some(sub) = &self.sub_resource_id {
            write!(f, "/{sub}")?;
        }
        Ok(())
    }
}

/// Result of a single poll: the reported status and, when the object still
/// exists, the fetched payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusSnapshot<T> {
    /// Status used to decide whether the wait terminates.
    pub status: Status,
    /// Full object returned by the API, if any.
    pub payload: Option<T>,
}

impl<T> StatusSnapshot<T> {
    /// Builds a snapshot carrying the fetched object.
    #[must_use]
    pub fn new(status: impl Into<Status>, payload: T) -> Self {
        Self {
            status: status.into(),
            payload: Some(payload),
        }
    }

    /// Builds a snapshot with no payload.
    #[must_use]
    pub fn bare(status: impl Into<Status>) -> Self {
        Self {
            status: status.into(),
            payload: None,
        }
    }

    /// Snapshot returned by absence waits once the resource is gone.
    #[must_use]
    pub fn not_found() -> Self {
        Self::bare(STATUS_NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_target_displays_composite_key() {
        let target = PollTarget::new("ws-1", "nsg-1").with_sub_resource("member-9");
        assert_eq!(target.to_string(), "ws-1/nsg-1/member-9");
        assert_eq!(PollTarget::new("ws-1", "vol-1").to_string(), "ws-1/vol-1");
    }

    #[test]
    fn status_compares_case_sensitively() {
        assert_ne!(Status::from("ACTIVE"), Status::from("active"));
        assert_eq!(Status::from("ACTIVE").as_str(), "ACTIVE");
    }

    #[test]
    fn not_found_snapshot_has_no_payload() {
        let snapshot = StatusSnapshot::<()>::not_found();
        assert_eq!(snapshot.status.as_str(), STATUS_NOT_FOUND);
        assert!(snapshot.payload.is_none());
    }
}
