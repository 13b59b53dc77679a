use serde_derive::Serialize;

use crate::metadata::field::MetadataField;

/// Aggregated result of a batch fetch, one slot per catalog field.
///
/// A slot is `None` when its field was not requested. Values are the raw
/// response bodies, untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    service_offering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_hostname: Option<String>,
    #[serde(rename = "InstanceID", skip_serializing_if = "Option::is_none")]
    instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_data: Option<String>,
}

impl MetadataRecord {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::ServiceOffering => self.service_offering.as_deref(),
            MetadataField::AvailabilityZone => self.availability_zone.as_deref(),
            MetadataField::LocalIpv4 => self.local_ipv4.as_deref(),
            MetadataField::LocalHostname => self.local_hostname.as_deref(),
            MetadataField::PublicIpv4 => self.public_ipv4.as_deref(),
            MetadataField::PublicHostname => self.public_hostname.as_deref(),
            MetadataField::InstanceId => self.instance_id.as_deref(),
            MetadataField::UserData => self.user_data.as_deref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, field: MetadataField) -> &mut Option<String> {
        match field {
            MetadataField::ServiceOffering => &mut self.service_offering,
            MetadataField::AvailabilityZone => &mut self.availability_zone,
            MetadataField::LocalIpv4 => &mut self.local_ipv4,
            MetadataField::LocalHostname => &mut self.local_hostname,
            MetadataField::PublicIpv4 => &mut self.public_ipv4,
            MetadataField::PublicHostname => &mut self.public_hostname,
            MetadataField::InstanceId => &mut self.instance_id,
            MetadataField::UserData => &mut self.user_data,
        }
    }

    /// Populated slots in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> + '_ {
        MetadataField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
