//! Per-aircraft separation parameters and their global defaults.

use serde::{Deserialize, Serialize};

use crate::config::DetectionSettings;
use crate::error::DetectionError;
use crate::units::{ZoneParam, FT, NM};

/// A configuration request for one of the [`ZoneParam`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRequest {
    /// Report the global default (`idx == None`) or one aircraft's value.
    Query { idx: Option<usize> },
    /// Change the default inherited by aircraft created from now on.
    SetDefault(f64),
    /// Change one aircraft's value.
    SetForAgent { idx: usize, value: f64 },
}

impl ParamRequest {
    /// Build a request from the optional console arguments.
    pub fn from_args(value: Option<f64>, idx: Option<usize>) -> Self {
        match (value, idx) {
            (None, idx) => ParamRequest::Query { idx },
            (Some(value), None) => ParamRequest::SetDefault(value),
            (Some(value), Some(idx)) => ParamRequest::SetForAgent { idx, value },
        }
    }
}

/// Global defaults, stored in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefaults {
    pub rpz: f64,
    pub hpz: f64,
    pub dtlookahead: f64,
    pub dtnolook: f64,
}

impl From<&DetectionSettings> for ZoneDefaults {
    fn from(settings: &DetectionSettings) -> Self {
        Self {
            rpz: settings.pzr_nm * NM,
            hpz: settings.pzh_ft * FT,
            dtlookahead: settings.dtlookahead_s,
            dtnolook: settings.dtnolook_s,
        }
    }
}

impl ZoneDefaults {
    pub fn get(&self, param: ZoneParam) -> f64 {
        match param {
            ZoneParam::Radius => self.rpz,
            ZoneParam::Height => self.hpz,
            ZoneParam::Lookahead => self.dtlookahead,
            ZoneParam::NoLook => self.dtnolook,
        }
    }

    fn set(&mut self, param: ZoneParam, value: f64) {
        match param {
            ZoneParam::Radius => self.rpz = value,
            ZoneParam::Height => self.hpz = value,
            ZoneParam::Lookahead => self.dtlookahead = value,
            ZoneParam::NoLook => self.dtnolook = value,
        }
    }
}

/// Index-aligned per-aircraft parameter arrays (SI units).
///
/// Every array has exactly `ntraf` entries; slots are only added by
/// [`ParameterStore::create`] and removed by [`ParameterStore::delete`].
#[derive(Debug, Clone)]
pub struct ParameterStore {
    defaults: ZoneDefaults,
    rpz: Vec<f64>,
    hpz: Vec<f64>,
    dtlookahead: Vec<f64>,
    dtnolook: Vec<f64>,
}

impl ParameterStore {
    pub fn new(settings: &DetectionSettings) -> Self {
        Self {
            defaults: ZoneDefaults::from(settings),
            rpz: Vec::new(),
            hpz: Vec::new(),
            dtlookahead: Vec::new(),
            dtnolook: Vec::new(),
        }
    }

    pub fn ntraf(&self) -> usize {
        self.rpz.len()
    }

    pub fn defaults(&self) -> &ZoneDefaults {
        &self.defaults
    }

    pub fn rpz(&self) -> &[f64] {
        &self.rpz
    }

    pub fn hpz(&self) -> &[f64] {
        &self.hpz
    }

    pub fn dtlookahead(&self) -> &[f64] {
        &self.dtlookahead
    }

    pub fn dtnolook(&self) -> &[f64] {
        &self.dtnolook
    }

    /// Append `n` slots initialised from the current defaults.
    pub fn create(&mut self, n: usize) {
        let ntraf = self.ntraf() + n;
        self.rpz.resize(ntraf, self.defaults.rpz);
        self.hpz.resize(ntraf, self.defaults.hpz);
        self.dtlookahead.resize(ntraf, self.defaults.dtlookahead);
        self.dtnolook.resize(ntraf, self.defaults.dtnolook);
    }

    /// Remove one slot, shifting later slots down.
    ///
    /// Callers validate `idx` against [`ParameterStore::ntraf`].
    pub(crate) fn delete(&mut self, idx: usize) {
        self.rpz.remove(idx);
        self.hpz.remove(idx);
        self.dtlookahead.remove(idx);
        self.dtnolook.remove(idx);
    }

    /// Drop all slots and restore the defaults from `settings`.
    pub fn reset(&mut self, settings: &DetectionSettings) {
        *self = Self::new(settings);
    }

    pub fn value(&self, param: ZoneParam, idx: usize) -> Result<f64, DetectionError> {
        self.column(param)
            .get(idx)
            .copied()
            .ok_or(DetectionError::AgentIndexOutOfRange {
                idx,
                ntraf: self.ntraf(),
            })
    }

    pub fn set_default(&mut self, param: ZoneParam, value: f64) {
        self.defaults.set(param, value);
    }

    pub fn set_value(
        &mut self,
        param: ZoneParam,
        idx: usize,
        value: f64,
    ) -> Result<(), DetectionError> {
        let ntraf = self.ntraf();
        let slot = self
            .column_mut(param)
            .get_mut(idx)
            .ok_or(DetectionError::AgentIndexOutOfRange { idx, ntraf })?;
        *slot = value;
        Ok(())
    }

    /// Apply a console request. `value`s are in display units.
    ///
    /// No range validation is done: zero or negative values are stored as given.
    pub fn apply(
        &mut self,
        param: ZoneParam,
        request: ParamRequest,
    ) -> Result<String, DetectionError> {
        let unit = param.unit();
        let label = param.label();
        match request {
            ParamRequest::Query { idx: None } => Ok(format!(
                "Default {label} is set to {} {unit}",
                param.from_si(self.defaults.get(param))
            )),
            ParamRequest::Query { idx: Some(idx) } => {
                let value = param.from_si(self.value(param, idx)?);
                Ok(format!("Current {label} for selected aircraft: {value:.2} {unit}"))
            }
            ParamRequest::SetDefault(value) => {
                self.set_default(param, param.to_si(value));
                Ok(format!("Setting default {label} to {value} {unit}"))
            }
            ParamRequest::SetForAgent { idx, value } => {
                self.set_value(param, idx, param.to_si(value))?;
                Ok(format!("Setting {label} to {value} {unit} for selected aircraft"))
            }
        }
    }

    fn column(&self, param: ZoneParam) -> &[f64] {
        match param {
            ZoneParam::Radius => &self.rpz,
            ZoneParam::Height => &self.hpz,
            ZoneParam::Lookahead => &self.dtlookahead,
            ZoneParam::NoLook => &self.dtnolook,
        }
    }

    fn column_mut(&mut self, param: ZoneParam) -> &mut Vec<f64> {
        match param {
            ZoneParam::Radius => &mut self.rpz,
            ZoneParam::Height => &mut self.hpz,
            ZoneParam::Lookahead => &mut self.dtlookahead,
            ZoneParam::NoLook => &mut self.dtnolook,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ParameterStore {
        ParameterStore::new(&DetectionSettings::default())
    }

    #[test]
    fn from_args_picks_variant() {
        assert_eq!(ParamRequest::from_args(None, None), ParamRequest::Query { idx: None });
        assert_eq!(ParamRequest::from_args(None, Some(2)), ParamRequest::Query { idx: Some(2) });
        assert_eq!(ParamRequest::from_args(Some(7.0), None), ParamRequest::SetDefault(7.0));
        assert_eq!(
            ParamRequest::from_args(Some(7.0), Some(1)),
            ParamRequest::SetForAgent { idx: 1, value: 7.0 }
        );
    }

    #[test]
    fn create_appends_slots_with_current_defaults() {
        let mut params = store();
        params.create(2);
        params.set_default(ZoneParam::Radius, 7.0 * NM);
        params.create(1);

        assert_eq!(params.ntraf(), 3);
        assert_eq!(params.rpz(), &[5.0 * NM, 5.0 * NM, 7.0 * NM]);
        assert_eq!(params.hpz().len(), 3);
        assert_eq!(params.dtlookahead(), &[300.0; 3]);
        assert_eq!(params.dtnolook(), &[0.0; 3]);
    }

    #[test]
    fn per_agent_round_trip_in_display_units() {
        let mut params = store();
        params.create(3);
        params
            .apply(ZoneParam::Radius, ParamRequest::SetForAgent { idx: 1, value: 5.0 })
            .unwrap();
        let stored = params.value(ZoneParam::Radius, 1).unwrap();
        assert!((ZoneParam::Radius.from_si(stored) - 5.0).abs() < 1e-9);

        let reply = params
            .apply(ZoneParam::Radius, ParamRequest::Query { idx: Some(1) })
            .unwrap();
        assert_eq!(reply, "Current PZ radius for selected aircraft: 5.00 NM");
    }

    #[test]
    fn height_default_is_set_in_feet() {
        let mut params = store();
        params.apply(ZoneParam::Height, ParamRequest::SetDefault(2000.0)).unwrap();
        assert!((params.defaults().hpz - 2000.0 * FT).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_index_leaves_values_untouched() {
        let mut params = store();
        params.create(1);
        let err = params
            .apply(ZoneParam::Lookahead, ParamRequest::SetForAgent { idx: 4, value: 60.0 })
            .unwrap_err();
        assert_eq!(err, DetectionError::AgentIndexOutOfRange { idx: 4, ntraf: 1 });
        assert_eq!(params.dtlookahead(), &[300.0]);
    }

    #[test]
    fn negative_values_are_accepted() {
        let mut params = store();
        params.create(1);
        params
            .apply(ZoneParam::NoLook, ParamRequest::SetForAgent { idx: 0, value: -5.0 })
            .unwrap();
        assert_eq!(params.dtnolook(), &[-5.0]);
    }

    #[test]
    fn delete_compacts_every_column() {
        let mut params = store();
        params.create(3);
        params.set_value(ZoneParam::Radius, 2, 1.0).unwrap();
        params.delete(0);
        assert_eq!(params.ntraf(), 2);
        assert_eq!(params.rpz()[1], 1.0);
        assert_eq!(params.dtnolook().len(), 2);
    }
}
