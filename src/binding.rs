//! Binding profiles: one remapping table plus the devices it governs.
//!
//! A profile always starts from the canonical defaults (see [`crate::codes`]) and
//! layers user overrides on top, so lookups against default physical codes never miss.

use crate::codec::{BindRecord, ProfileRecord};
use crate::codes::{canonical, PhysicalCode, VirtualCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a physical code maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingEntry {
    pub virtual_code: VirtualCode,
    pub is_axis: bool,
}

/// Physical code → entry.
pub type BindingTable = HashMap<PhysicalCode, BindingEntry>;

/// The canonical default assignment as a table.
pub fn default_table() -> BindingTable {
    canonical()
        .iter()
        .map(|c| {
            (
                c.default_physical,
                BindingEntry {
                    virtual_code: c.virtual_code,
                    is_axis: c.is_axis,
                },
            )
        })
        .collect()
}

/// Builds a new table: `defaults` first, then every override in order (last write wins).
pub fn merge<I>(defaults: &BindingTable, overrides: I) -> BindingTable
where
    I: IntoIterator<Item = (PhysicalCode, BindingEntry)>,
{
    let mut table = defaults.clone();
    table.extend(overrides);
    table
}

/// Named remapping table and the device ids it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingProfile {
    name: String,
    table: BindingTable,
    devices: Vec<String>,
}

impl Default for BindingProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingProfile {
    /// Defaults only, no name, no devices.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            table: default_table(),
            devices: Vec::new(),
        }
    }

    /// Defaults overlaid with the record's overrides, plus its devices and name.
    pub fn from_record(record: &ProfileRecord) -> Self {
        let overrides = record.binds.iter().map(|b| {
            (
                PhysicalCode(b.physical_in),
                BindingEntry {
                    virtual_code: VirtualCode(b.virtual_out),
                    is_axis: b.is_axis,
                },
            )
        });

        let mut profile = Self {
            name: record.name.clone(),
            table: merge(&default_table(), overrides),
            devices: Vec::with_capacity(record.devices.len()),
        };
        for device in &record.devices {
            profile.add_device(device.as_str());
        }
        profile
    }

    /// One record per table entry, sorted by physical code.
    pub fn to_record(&self) -> ProfileRecord {
        let mut binds: Vec<BindRecord> = self
            .table
            .iter()
            .map(|(physical, entry)| BindRecord {
                physical_in: physical.0,
                virtual_out: entry.virtual_code.0,
                is_axis: entry.is_axis,
            })
            .collect();
        binds.sort_by_key(|b| b.physical_in);

        ProfileRecord {
            name: self.name.clone(),
            binds,
            devices: self.devices.clone(),
        }
    }

    /// Mapped virtual code, or [`VirtualCode::UNMAPPED`] for codes never bound.
    #[inline]
    pub fn translate(&self, physical: PhysicalCode) -> VirtualCode {
        self.table
            .get(&physical)
            .map_or(VirtualCode::UNMAPPED, |e| e.virtual_code)
    }

    #[inline]
    pub fn entry(&self, physical: PhysicalCode) -> Option<BindingEntry> {
        self.table.get(&physical).copied()
    }

    /// Axis flag of the entry (false when unbound).
    pub fn is_axis(&self, physical: PhysicalCode) -> bool {
        self.table.get(&physical).is_some_and(|e| e.is_axis)
    }

    /// Iterates entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (PhysicalCode, BindingEntry)> + '_ {
        self.table.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Binds (or rebinds) a physical code. Returns the previous entry.
    pub fn bind(
        &mut self,
        physical: PhysicalCode,
        virtual_code: VirtualCode,
        is_axis: bool,
    ) -> Option<BindingEntry> {
        self.table.insert(
            physical,
            BindingEntry {
                virtual_code,
                is_axis,
            },
        )
    }

    /// Restores the default entry for `physical`, or drops it if it has no default.
    pub fn reset(&mut self, physical: PhysicalCode) {
        match canonical().iter().find(|c| c.default_physical == physical) {
            Some(c) => {
                self.bind(physical, c.virtual_code, c.is_axis);
            }
            None => {
                self.table.remove(&physical);
            }
        }
    }

    /// Device ids in insertion order.
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    pub fn claims(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d == device_id)
    }

    /// Adds a device id. Returns `false` if it was already claimed by this profile.
    pub fn add_device(&mut self, device_id: impl Into<String>) -> bool {
        let device_id = device_id.into();
        if self.claims(&device_id) {
            return false;
        }
        self.devices.push(device_id);
        true
    }

    /// Removes a device id. Returns whether it was present.
    pub fn remove_device(&mut self, device_id: &str) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d != device_id);
        self.devices.len() != before
    }
}
