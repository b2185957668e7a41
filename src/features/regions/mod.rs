//! Indonesian administrative regions (wilayah) feature.
//!
//! Read-only lookup, search and address resolution over the seeded
//! `indonesia_regions` table. The level of a region is implied by the
//! length of its dotted code.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces (Provinsi) - `11`
//! - Level 2: Regencies/Cities (Kabupaten/Kota) - `11.01`
//! - Level 3: Districts (Kecamatan) - `11.01.01`
//! - Level 4: Villages (Kelurahan/Desa) - `11.01.01.2001`
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/regions` | List children of `parent_code` (provinces by default) |
//! | GET | `/api/regions/select` | Children as a code → name map |
//! | GET | `/api/regions/search` | Search by name, villages also by postal code |
//! | GET | `/api/regions/postal-codes/{postal_code}` | Region carrying a postal code |
//! | GET | `/api/regions/{code}` | Get region by code |
//! | GET | `/api/regions/{code}/info` | Region with its ancestors and full address |
//! | GET | `/api/regions/{code}/address` | Full address of a region |
//! | GET | `/api/regions/{code}/validate` | Check a region code |
//! | DELETE | `/api/regions/cache` | Invalidate cached lookups |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::{RegionCache, RegionService};
pub use stores::PgRegionStore;
