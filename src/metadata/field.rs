use std::fmt::Formatter;
use std::str::FromStr;

use crate::errors::Error;

/// The closed set of metadata fields served under `/latest/`.
///
/// Declaration order is the catalog order and is used to break ties when
/// reporting batch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    ServiceOffering,
    AvailabilityZone,
    LocalIpv4,
    LocalHostname,
    PublicIpv4,
    PublicHostname,
    InstanceId,
    UserData,
}

impl MetadataField {
    pub const ALL: [MetadataField; 8] = [
        MetadataField::ServiceOffering,
        MetadataField::AvailabilityZone,
        MetadataField::LocalIpv4,
        MetadataField::LocalHostname,
        MetadataField::PublicIpv4,
        MetadataField::PublicHostname,
        MetadataField::InstanceId,
        MetadataField::UserData,
    ];

    /// Wire name, as it appears in the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::ServiceOffering => "service-offering",
            MetadataField::AvailabilityZone => "availability-zone",
            MetadataField::LocalIpv4 => "local-ipv4",
            MetadataField::LocalHostname => "local-hostname",
            MetadataField::PublicIpv4 => "public-ipv4",
            MetadataField::PublicHostname => "public-hostname",
            MetadataField::InstanceId => "instance-id",
            MetadataField::UserData => "user-data",
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataField {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        MetadataField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }
}
