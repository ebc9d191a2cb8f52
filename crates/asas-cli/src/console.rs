//! Line-oriented operator console driving the detection engine.

use anyhow::{anyhow, bail, Context, Result};
use asas_core::{CanonicalPair, ConflictDetection, ParamRequest, ZoneParam};

use crate::sim::Simulation;

pub const USAGE: &str = "\
Commands:
  CDMETHOD [name]            query or select the CD method (OFF, ON, ...)
  ZONER [nm] [acid|idx]      protection zone radius
  ZONEDH [ft] [acid|idx]     protection zone half-height
  DTLOOK [sec] [acid|idx]    lookahead time
  DTNOLOOK [sec] [acid|idx]  no-look interval after a resolution
  STEP [n]                   advance the simulation n ticks (default 1)
  CONFLICTS                  list current conflicts and history size
  CLEAR                      clear the current conflict database
  RESET                      reload the scenario and restore defaults
  QUIT";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    CdMethod(Option<String>),
    Zone {
        param: ZoneParam,
        value: Option<f64>,
        target: Option<String>,
    },
    Step(usize),
    Conflicts,
    Clear,
    Reset,
    Quit,
}

/// Parse a console line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default().to_ascii_uppercase();
    let args: Vec<&str> = words.collect();

    let command = match keyword.as_str() {
        "CDMETHOD" | "ASAS" => {
            expect_at_most(&keyword, &args, 1)?;
            ConsoleCommand::CdMethod(args.first().map(|name| name.to_ascii_uppercase()))
        }
        "ZONER" | "PZR" => zone(ZoneParam::Radius, &keyword, &args)?,
        "ZONEDH" | "PZH" => zone(ZoneParam::Height, &keyword, &args)?,
        "DTLOOK" => zone(ZoneParam::Lookahead, &keyword, &args)?,
        "DTNOLOOK" => zone(ZoneParam::NoLook, &keyword, &args)?,
        "STEP" => {
            expect_at_most(&keyword, &args, 1)?;
            let n = match args.first() {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("STEP expects a tick count, got '{raw}'"))?,
                None => 1,
            };
            ConsoleCommand::Step(n)
        }
        "CONFLICTS" => ConsoleCommand::Conflicts,
        "CLEAR" => ConsoleCommand::Clear,
        "RESET" => ConsoleCommand::Reset,
        "QUIT" | "EXIT" => ConsoleCommand::Quit,
        other => bail!("Unknown command '{other}'"),
    };
    Ok(Some(command))
}

fn expect_at_most(keyword: &str, args: &[&str], n: usize) -> Result<()> {
    if args.len() > n {
        bail!("{keyword} takes at most {n} argument(s)");
    }
    Ok(())
}

fn zone(param: ZoneParam, keyword: &str, args: &[&str]) -> Result<ConsoleCommand> {
    expect_at_most(keyword, args, 2)?;
    let value = args
        .first()
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("{keyword} expects a number, got '{raw}'"))
        })
        .transpose()?;
    Ok(ConsoleCommand::Zone {
        param,
        value,
        target: args.get(1).map(|s| s.to_string()),
    })
}

/// Engine plus simulation, driven one console command at a time.
pub struct Console {
    engine: ConflictDetection,
    sim: Simulation,
}

impl Console {
    /// Wire a fresh engine to the simulation's population.
    pub fn new(mut engine: ConflictDetection, sim: Simulation) -> Self {
        engine.create(sim.ntraf());
        Self { engine, sim }
    }

    pub fn engine(&self) -> &ConflictDetection {
        &self.engine
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Execute a command and return the lines to print.
    pub fn execute(&mut self, command: ConsoleCommand) -> Result<Vec<String>> {
        match command {
            ConsoleCommand::CdMethod(name) => {
                let reply = self.engine.set_method(name.as_deref());
                Ok(vec![reply.message])
            }
            ConsoleCommand::Zone {
                param,
                value,
                target,
            } => {
                let idx = target.as_deref().map(|t| self.resolve(t)).transpose()?;
                let reply = self.engine.configure(param, ParamRequest::from_args(value, idx));
                Ok(vec![reply.message])
            }
            ConsoleCommand::Step(n) => self.step(n),
            ConsoleCommand::Conflicts => Ok(self.report()),
            ConsoleCommand::Clear => {
                self.engine.clear();
                Ok(vec!["Conflict database cleared.".to_string()])
            }
            ConsoleCommand::Reset => {
                self.engine.reset();
                self.sim.restart();
                self.engine.create(self.sim.ntraf());
                Ok(vec![format!("Scenario '{}' reloaded.", self.sim.scenario().name)])
            }
            ConsoleCommand::Quit => Ok(Vec::new()),
        }
    }

    /// Aircraft slot from a callsign or a numeric index.
    fn resolve(&self, target: &str) -> Result<usize> {
        let by_callsign = (0..self.sim.ntraf())
            .find(|&i| self.sim.callsign(i).eq_ignore_ascii_case(target));
        if let Some(idx) = by_callsign {
            return Ok(idx);
        }
        target
            .parse()
            .map_err(|_| anyhow!("Unknown aircraft '{target}'"))
    }

    fn step(&mut self, n: usize) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for _ in 0..n {
            let traffic = self.sim.advance();
            let conf_before = self.engine.state().confpairs_all().len();
            let los_before = self.engine.state().lospairs_all().len();
            self.engine.update(&traffic, &traffic)?;

            let state = self.engine.state();
            let simt = self.sim.simt();
            for pair in &state.confpairs_all().pairs()[conf_before..] {
                lines.push(format!("t={simt:>6.0}s  CONFLICT {}", self.describe(pair)));
            }
            for pair in &state.lospairs_all().pairs()[los_before..] {
                lines.push(format!("t={simt:>6.0}s  LOS      {}", self.describe(pair)));
            }
        }
        Ok(lines)
    }

    fn report(&self) -> Vec<String> {
        let state = self.engine.state();
        let mut current: Vec<&CanonicalPair> = state.confpairs_unique().iter().collect();
        current.sort();

        let mut lines: Vec<String> = current
            .into_iter()
            .map(|pair| {
                let tcpa = state
                    .confpairs()
                    .iter()
                    .position(|&raw| CanonicalPair::from(raw) == *pair)
                    .and_then(|i| state.tcpa().get(i))
                    .copied()
                    .unwrap_or(f64::NAN);
                let los = if state.lospairs_unique().contains(pair) { " LOS" } else { "" };
                format!("{} tcpa={tcpa:.0}s{los}", self.describe(pair))
            })
            .collect();
        lines.push(format!(
            "t={:.0}s method={} current={} history: {} conflicts, {} LoS",
            self.sim.simt(),
            self.engine.active_method(),
            state.confpairs_unique().len(),
            state.confpairs_all().len(),
            state.lospairs_all().len()
        ));
        lines
    }

    fn describe(&self, pair: &CanonicalPair) -> String {
        format!(
            "{} - {}",
            self.sim.callsign(pair.first()),
            self.sim.callsign(pair.second())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::create_crossing_scenario;

    fn console() -> Console {
        let sim = Simulation::new(create_crossing_scenario(52.0, 4.0), 10.0);
        Console::new(ConflictDetection::default(), sim)
    }

    #[test]
    fn parses_zone_commands() {
        assert_eq!(
            parse("zoner 7").unwrap(),
            Some(ConsoleCommand::Zone {
                param: ZoneParam::Radius,
                value: Some(7.0),
                target: None
            })
        );
        assert_eq!(
            parse("DTLOOK 120 KL204").unwrap(),
            Some(ConsoleCommand::Zone {
                param: ZoneParam::Lookahead,
                value: Some(120.0),
                target: Some("KL204".into())
            })
        );
        assert!(parse("ZONEDH high").is_err());
    }

    #[test]
    fn parses_control_commands() {
        assert_eq!(parse("  ").unwrap(), None);
        assert_eq!(parse("# comment").unwrap(), None);
        assert_eq!(parse("step").unwrap(), Some(ConsoleCommand::Step(1)));
        assert_eq!(parse("STEP 30").unwrap(), Some(ConsoleCommand::Step(30)));
        assert_eq!(
            parse("cdmethod statebased").unwrap(),
            Some(ConsoleCommand::CdMethod(Some("STATEBASED".into())))
        );
        assert!(parse("FLY KL204").is_err());
        assert!(parse("CDMETHOD A B").is_err());
    }

    #[test]
    fn crossing_traffic_is_reported_once() {
        let mut console = console();
        let reply = console.execute(ConsoleCommand::CdMethod(Some("ON".into()))).unwrap();
        assert_eq!(reply, vec!["Selected STATEBASED as CD method."]);

        // 30 NM at 230 m/s: the pair enters lookahead well before 60 ticks
        let lines = console.execute(ConsoleCommand::Step(60)).unwrap();
        let conflicts: Vec<_> = lines.iter().filter(|l| l.contains("CONFLICT")).collect();
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].ends_with("KL204 - BA117"));
        assert_eq!(console.engine().state().confpairs_all().len(), 1);
    }

    #[test]
    fn zone_target_resolves_callsign() {
        let mut console = console();
        let reply = console
            .execute(parse("ZONER 3 ba117").unwrap().unwrap())
            .unwrap();
        assert_eq!(reply, vec!["Setting PZ radius to 3 NM for selected aircraft"]);
        assert_eq!(console.engine().params().rpz()[1], 3.0 * asas_core::NM);
        assert!(console.execute(parse("ZONER 3 XX999").unwrap().unwrap()).is_err());
    }

    #[test]
    fn reset_reloads_population() {
        let mut console = console();
        console.execute(ConsoleCommand::CdMethod(Some("ON".into()))).unwrap();
        console.execute(ConsoleCommand::Step(60)).unwrap();
        console.execute(ConsoleCommand::Reset).unwrap();

        assert_eq!(console.simulation().simt(), 0.0);
        assert_eq!(console.engine().ntraf(), 2);
        assert!(console.engine().state().confpairs_all().is_empty());
    }
}
