use crate::core::hospital::Hospital;
use crate::domain::model::{BirthDate, Grade, Name, Sex};
use crate::domain::team::TeamRoster;
use crate::utils::error::{HospitalError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// A setup line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub line: usize,
    pub message: String,
}

/// What a setup run added to the hospital.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub wards: usize,
    pub teams: usize,
    pub admitted: usize,
    /// Seed patients for whom no ward had a free bed.
    pub unplaced: usize,
    pub issues: Vec<ParseIssue>,
}

struct PendingPatient {
    line: usize,
    name: Name,
    sex: Sex,
    date_of_birth: BirthDate,
}

struct PendingTeam {
    line: usize,
    roster: TeamRoster,
    patients: Vec<PendingPatient>,
}

/// Reads `path` and adds its wards, teams, doctors and patients to `hospital`.
///
/// Loading is best effort: a bad line is reported in the returned
/// [`LoadReport`] and skipped. Only failing to open or read the file is an
/// error.
pub fn load_setup(hospital: &mut Hospital, path: impl AsRef<Path>) -> Result<LoadReport> {
    let path = path.as_ref();
    let reader = setup_reader()
        .from_path(path)
        .map_err(|source| HospitalError::SetupFile {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!("📁 Reading hospital setup from {}", path.display());
    SetupLoader::new(hospital).run(reader)
}

pub fn load_setup_from_reader<R: Read>(hospital: &mut Hospital, input: R) -> Result<LoadReport> {
    SetupLoader::new(hospital).run(setup_reader().from_reader(input))
}

fn setup_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .trim(Trim::All);
    builder
}

struct SetupLoader<'a> {
    hospital: &'a mut Hospital,
    current: Option<PendingTeam>,
    report: LoadReport,
}

impl<'a> SetupLoader<'a> {
    fn new(hospital: &'a mut Hospital) -> Self {
        Self {
            hospital,
            current: None,
            report: LoadReport::default(),
        }
    }

    fn run<R: Read>(mut self, mut reader: csv::Reader<R>) -> Result<LoadReport> {
        for result in reader.records() {
            match result {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|pos| pos.line() as usize)
                        .unwrap_or_default();
                    if let Err(message) = self.apply(line, &record) {
                        self.reject(line, message);
                    }
                }
                Err(e) if e.is_io_error() => return Err(HospitalError::CsvError(e)),
                Err(e) => {
                    let line = e
                        .position()
                        .map(|pos| pos.line() as usize)
                        .unwrap_or_default();
                    self.reject(line, e.to_string());
                }
            }
        }
        self.close_team();

        tracing::info!(
            "✅ Setup loaded: {} wards, {} teams, {} patients admitted",
            self.report.wards,
            self.report.teams,
            self.report.admitted
        );
        if !self.report.issues.is_empty() {
            tracing::warn!("⚠️ {} setup lines were skipped", self.report.issues.len());
        }
        Ok(self.report)
    }

    fn reject(&mut self, line: usize, message: String) {
        let err = HospitalError::parse(line, message.clone());
        tracing::warn!("{}: Data corrupted", err);
        self.report.issues.push(ParseIssue { line, message });
    }

    fn apply(&mut self, line: usize, record: &StringRecord) -> std::result::Result<(), String> {
        let tag = field(record, 0, "record tag")?;
        match tag.to_ascii_lowercase().as_str() {
            "ward" => {
                let name = field(record, 1, "ward name")?;
                let sex: Sex = field(record, 2, "ward type")?.parse()?;
                let capacity: usize = field(record, 3, "capacity")?
                    .parse()
                    .map_err(|e| format!("invalid capacity: {}", e))?;
                self.hospital
                    .add_ward(name, sex, capacity)
                    .map_err(|e| e.to_string())?;
                self.report.wards += 1;
            }
            "team" => {
                // Any Team line ends the previous team, even one that fails to parse.
                self.close_team();
                let code = field(record, 1, "team code")?;
                self.current = Some(PendingTeam {
                    line,
                    roster: TeamRoster::new(code),
                    patients: Vec::new(),
                });
            }
            "consultant" => {
                let name = person(record)?;
                let team = self.open_team(tag)?;
                if let Some(existing) = &team.roster.consultant {
                    return Err(format!(
                        "team {} is already headed by {}",
                        team.roster.code, existing
                    ));
                }
                team.roster.consultant = Some(name);
            }
            "junior" => {
                let name = person(record)?;
                let grade: Grade = field(record, 4, "grade")?.parse()?;
                self.open_team(tag)?.roster.juniors.push((name, grade));
            }
            "patient" => {
                let name = person(record)?;
                let sex: Sex = field(record, 4, "sex")?.parse()?;
                let date_of_birth: BirthDate = field(record, 5, "date of birth")?.parse()?;
                self.open_team(tag)?.patients.push(PendingPatient {
                    line,
                    name,
                    sex,
                    date_of_birth,
                });
            }
            other => return Err(format!("unknown record tag '{}'", other)),
        }
        Ok(())
    }

    fn open_team(&mut self, tag: &str) -> std::result::Result<&mut PendingTeam, String> {
        self.current
            .as_mut()
            .ok_or_else(|| format!("{} line appears before any Team line", tag))
    }

    /// Registers the buffered team, then admits its buffered patients through
    /// the normal admission path.
    fn close_team(&mut self) {
        let Some(pending) = self.current.take() else {
            return;
        };

        let team = match self.hospital.add_team(pending.roster) {
            Ok(team) => team,
            Err(e) => {
                self.reject(pending.line, e.to_string());
                if !pending.patients.is_empty() {
                    tracing::warn!(
                        "Skipping {} patients of rejected team on line {}",
                        pending.patients.len(),
                        pending.line
                    );
                }
                return;
            }
        };
        self.report.teams += 1;

        for patient in pending.patients {
            let name = patient.name.clone();
            match self
                .hospital
                .admit(patient.name, patient.sex, patient.date_of_birth, team)
            {
                Ok(Some(_)) => self.report.admitted += 1,
                Ok(None) => {
                    tracing::warn!("No free {} bed for {}, not admitted", patient.sex, name);
                    self.report.unplaced += 1;
                }
                Err(e) => self.reject(patient.line, e.to_string()),
            }
        }
    }
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    label: &str,
) -> std::result::Result<&'r str, String> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("missing {}", label)),
    }
}

fn person(record: &StringRecord) -> std::result::Result<Name, String> {
    Name::new(
        field(record, 1, "title")?,
        field(record, 2, "given name")?,
        field(record, 3, "family name")?,
    )
}
