use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BIRTH_DATE_FORMAT: &str = "%d/%m/%y";

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub(crate) usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Position of a ward in the hospital's ward list.
    WardId
);
arena_id!(
    /// Position of a team in the hospital's team list.
    TeamId
);
arena_id!(
    /// Position of a doctor in the hospital's staff list.
    DoctorId
);
arena_id!(
    /// Admission number; never reused within one hospital.
    PatientId
);

impl FromStr for PatientId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PatientId)
    }
}

impl FromStr for DoctorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(DoctorId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Sex::M),
            "F" => Ok(Sex::F),
            other => Err(format!("unknown sex '{}', expected M or F", other)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::M => write!(f, "M"),
            Sex::F => write!(f, "F"),
        }
    }
}

/// Junior doctor ranks, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Foundation1,
    Foundation2,
    Specialty,
}

impl Grade {
    pub fn lowest() -> Self {
        Grade::Foundation1
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FOUNDATION1" | "ONE" | "1" => Ok(Grade::Foundation1),
            "FOUNDATION2" | "TWO" | "2" => Ok(Grade::Foundation2),
            "SPECIALTY" | "THREE" | "3" => Ok(Grade::Specialty),
            other => Err(format!("unknown grade '{}'", other)),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Foundation1 => "Foundation1",
            Grade::Foundation2 => "Foundation2",
            Grade::Specialty => "Specialty",
        };
        f.write_str(label)
    }
}

/// A person's name as (title, given, family).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name {
    title: String,
    given: String,
    family: String,
}

impl Name {
    /// Builds a name from its three components, trimming each one.
    ///
    /// Every component must be non-empty after trimming.
    pub fn new(
        title: impl AsRef<str>,
        given: impl AsRef<str>,
        family: impl AsRef<str>,
    ) -> Result<Self, String> {
        let part = |label: &str, value: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(format!("name {} cannot be empty", label))
            } else {
                Ok(trimmed.to_owned())
            }
        };

        Ok(Self {
            title: part("title", title.as_ref())?,
            given: part("given name", given.as_ref())?,
            family: part("family name", family.as_ref())?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn given(&self) -> &str {
        &self.given
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.title, self.given, self.family)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for BirthDate {
    type Err = String;

    /// Parses `dd/MM/yy`; two-digit years 70-99 land in the 1900s, 00-69 in the 2000s.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), BIRTH_DATE_FORMAT)
            .map(BirthDate)
            .map_err(|e| format!("invalid date '{}' (expected dd/MM/yy): {}", s.trim(), e))
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTH_DATE_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoctorKind {
    Consultant,
    Junior(Grade),
}

/// A member of staff. Doctors compare equal by name and rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Doctor {
    name: Name,
    kind: DoctorKind,
}

impl Doctor {
    pub fn consultant(name: Name) -> Self {
        Self {
            name,
            kind: DoctorKind::Consultant,
        }
    }

    pub fn junior(name: Name, grade: Grade) -> Self {
        Self {
            name,
            kind: DoctorKind::Junior(grade),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn kind(&self) -> &DoctorKind {
        &self.kind
    }

    pub fn is_consultant(&self) -> bool {
        matches!(self.kind, DoctorKind::Consultant)
    }

    pub fn grade(&self) -> Option<Grade> {
        match self.kind {
            DoctorKind::Junior(grade) => Some(grade),
            DoctorKind::Consultant => None,
        }
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DoctorKind::Consultant => write!(f, "{} (Consultant)", self.name),
            DoctorKind::Junior(grade) => write!(f, "{} (Junior, {})", self.name, grade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sex_is_case_insensitive() {
        assert_eq!("f".parse::<Sex>().unwrap(), Sex::F);
        assert_eq!(" M ".parse::<Sex>().unwrap(), Sex::M);
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn test_parse_grade_aliases() {
        assert_eq!("Foundation1".parse::<Grade>().unwrap(), Grade::Foundation1);
        assert_eq!("ONE".parse::<Grade>().unwrap(), Grade::Foundation1);
        assert_eq!("2".parse::<Grade>().unwrap(), Grade::Foundation2);
        assert!("registrar".parse::<Grade>().is_err());
        assert!(Grade::lowest() < Grade::Specialty);
    }

    #[test]
    fn test_birth_date_two_digit_years() {
        let dob: BirthDate = "23/05/78".parse().unwrap();
        assert_eq!(dob.date(), NaiveDate::from_ymd_opt(1978, 5, 23).unwrap());
        assert_eq!(dob.to_string(), "23/05/78");

        let recent: BirthDate = "01/02/03".parse().unwrap();
        assert_eq!(recent.date(), NaiveDate::from_ymd_opt(2003, 2, 1).unwrap());

        assert!("31/02/78".parse::<BirthDate>().is_err());
        assert!("1978-05-23".parse::<BirthDate>().is_err());
    }

    #[test]
    fn test_name_components() {
        let name = Name::new(" Ms", "Bet ", "Lynch").unwrap();
        assert_eq!(name.to_string(), "Ms Bet Lynch");
        assert_eq!(name, Name::new("Ms", "Bet", "Lynch").unwrap());
        assert!(Name::new("Ms", "", "Lynch").is_err());
    }

    #[test]
    fn test_doctor_variants() {
        let smith = Doctor::consultant(Name::new("Dr", "John", "Smith").unwrap());
        assert!(smith.is_consultant());
        assert_eq!(smith.grade(), None);

        let jones = Doctor::junior(Name::new("Dr", "Ann", "Jones").unwrap(), Grade::Foundation1);
        assert!(!jones.is_consultant());
        assert_eq!(jones.grade(), Some(Grade::Foundation1));
        assert_eq!(jones.to_string(), "Dr Ann Jones (Junior, Foundation1)");
    }
}
