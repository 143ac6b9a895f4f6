use super::{Location, Resolver};
use crate::error::Result;
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, info, warn};

/// The subset of a GeoLite2/GeoIP2 City record we display
#[derive(Debug, Deserialize)]
struct CityRecord {
    city: Option<CityNames>,
    country: Option<CountryCode>,
}

#[derive(Debug, Deserialize)]
struct CityNames {
    names: Option<Names>,
}

#[derive(Debug, Deserialize)]
struct Names {
    en: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryCode {
    iso_code: Option<String>,
}

/// Resolves IP addresses against an offline MaxMind City database
pub struct GeoResolver {
    reader: Reader<Vec<u8>>,
}

impl GeoResolver {
    /// Load the database. The file is read once and never touched again.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path)?;

        info!(
            "Opened GeoIP database {} ({}, built {})",
            path.display(),
            reader.metadata.database_type,
            reader.metadata.build_epoch
        );

        Ok(Self { reader })
    }
}

impl Resolver for GeoResolver {
    fn resolve(&self, ip: IpAddr) -> Option<Location> {
        match self.reader.lookup::<CityRecord>(ip) {
            Ok(record) => {
                let country = record.country.and_then(|c| c.iso_code);
                let city = record.city.and_then(|c| c.names).and_then(|n| n.en);
                Location::from_parts(country.as_deref(), city.as_deref())
            }
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                debug!("No GeoIP record for {}", ip);
                None
            }
            Err(e) => {
                warn!("GeoIP lookup for {} failed: {}", ip, e);
                None
            }
        }
    }
}
