use ward_round::core::loader::load_setup_from_reader;
use ward_round::{BirthDate, Hospital, HospitalError, Name, Sex, TeamId};

const SETUP: &str = "\
Ward,Nightingale,F,4
Ward,Fleming,M,3
Ward,Seacole,F,2
Team,T1
Consultant,Dr,John,Smith
Junior,Dr,Ann,Jones,Foundation1
Junior,Dr,Tom,Hardy,Foundation2
Team,T2
Consultant,Dr,Mary,Brown
Junior,Dr,Raj,Patel,Foundation1
";

fn seeded() -> Hospital {
    let mut hospital = Hospital::new();
    let report = load_setup_from_reader(&mut hospital, SETUP.as_bytes()).unwrap();
    assert!(report.issues.is_empty());
    hospital
}

fn team(hospital: &Hospital, code: &str) -> TeamId {
    hospital.team_id_by_code(code).unwrap()
}

fn dob(text: &str) -> BirthDate {
    text.parse().unwrap()
}

fn free_beds(hospital: &Hospital) -> Vec<usize> {
    hospital.wards().iter().map(|ward| ward.free_beds()).collect()
}

#[test]
fn test_admit_happy_path() {
    let mut hospital = seeded();
    let t1 = team(&hospital, "T1");
    let bet = Name::new("Ms", "Bet", "Lynch").unwrap();

    let placement = hospital
        .admit(bet.clone(), Sex::F, dob("23/05/78"), t1)
        .unwrap()
        .expect("a female ward has free beds");

    let ward = hospital.ward(placement.ward).unwrap();
    assert_eq!(ward.name(), "Nightingale");
    assert_eq!(ward.free_beds(), 3);

    let patients = hospital.patients();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].name(), &bet);

    let consultant = hospital.consultant_of(placement.patient).unwrap();
    assert_eq!(consultant.name(), &Name::new("Dr", "John", "Smith").unwrap());
    assert_eq!(hospital.team_of(placement.patient).unwrap().code(), "T1");
    assert!(hospital
        .doctors_treating(placement.patient)
        .unwrap()
        .is_empty());

    hospital.check_invariants().unwrap();
}

#[test]
fn test_admit_with_no_bed_changes_nothing() {
    let mut hospital = seeded();
    let t2 = team(&hospital, "T2");

    for i in 0..6 {
        let name = Name::new("Ms", format!("Patient{}", i), "Full").unwrap();
        assert!(hospital
            .admit(name, Sex::F, dob("01/01/80"), t2)
            .unwrap()
            .is_some());
    }
    let before = free_beds(&hospital);
    let patients_before = hospital.patients().len();

    let outcome = hospital
        .admit(
            Name::new("Ms", "Bet", "Lynch").unwrap(),
            Sex::F,
            dob("23/05/78"),
            t2,
        )
        .unwrap();

    assert!(outcome.is_none());
    assert_eq!(free_beds(&hospital), before);
    assert_eq!(hospital.patients().len(), patients_before);
    assert!(hospital
        .find_patients(&Name::new("Ms", "Bet", "Lynch").unwrap())
        .is_empty());
    hospital.check_invariants().unwrap();
}

#[test]
fn test_admit_skips_wards_of_the_other_sex() {
    let mut hospital = Hospital::new();
    load_setup_from_reader(
        &mut hospital,
        "Ward,Seacole,F,1\nWard,Fleming,M,5\nTeam,T1\nConsultant,Dr,John,Smith\nJunior,Dr,Ann,Jones,1\n"
            .as_bytes(),
    )
    .unwrap();
    let t1 = team(&hospital, "T1");

    hospital
        .admit(Name::new("Ms", "Rita", "Sullivan").unwrap(), Sex::F, dob("15/01/50"), t1)
        .unwrap()
        .unwrap();
    let outcome = hospital
        .admit(Name::new("Ms", "Bet", "Lynch").unwrap(), Sex::F, dob("23/05/78"), t1)
        .unwrap();

    assert!(outcome.is_none());
    let fleming = hospital.ward_id_by_name("Fleming").unwrap();
    assert_eq!(hospital.ward(fleming).unwrap().free_beds(), 5);
}

#[test]
fn test_male_patient_goes_to_male_ward() {
    let mut hospital = seeded();
    let t1 = team(&hospital, "T1");

    let placement = hospital
        .admit(Name::new("Mr", "Ken", "Barlow").unwrap(), Sex::M, dob("09/12/39"), t1)
        .unwrap()
        .unwrap();

    assert_eq!(hospital.ward(placement.ward).unwrap().name(), "Fleming");
    assert_eq!(hospital.ward(placement.ward).unwrap().kind(), Sex::M);
}

#[test]
fn test_admissions_spread_to_the_emptiest_ward() {
    let mut hospital = seeded();
    let t1 = team(&hospital, "T1");

    let mut placed = Vec::new();
    for i in 0..4 {
        let name = Name::new("Ms", format!("Patient{}", i), "Spread").unwrap();
        let placement = hospital
            .admit(name, Sex::F, dob("01/01/80"), t1)
            .unwrap()
            .unwrap();
        placed.push(hospital.ward(placement.ward).unwrap().name().to_string());
    }

    // Nightingale 4 -> 3 -> 2 (tie with Seacole, first ward wins) -> 1, then Seacole 2.
    assert_eq!(
        placed,
        vec!["Nightingale", "Nightingale", "Nightingale", "Seacole"]
    );
    hospital.check_invariants().unwrap();
}

#[test]
fn test_admit_under_out_of_range_team_fails() {
    let mut hospital = seeded();
    let mut other = Hospital::new();
    load_setup_from_reader(
        &mut other,
        "Team,A\nConsultant,Dr,A,A\nJunior,Dr,B,B,1\nTeam,B\nConsultant,Dr,C,C\nJunior,Dr,D,D,1\nTeam,C\nConsultant,Dr,E,E\nJunior,Dr,F,F,1\n"
            .as_bytes(),
    )
    .unwrap();
    // Ids are positions: only the third team's id is out of range here.
    let foreign = other.team_id_by_code("C").unwrap();

    let err = hospital
        .admit(Name::new("Ms", "Bet", "Lynch").unwrap(), Sex::F, dob("23/05/78"), foreign)
        .unwrap_err();

    assert!(matches!(err, HospitalError::InvariantViolation { .. }));
    assert!(hospital.patients().is_empty());
}

#[test]
fn test_patients_and_wards_maps_team_patients() {
    let mut hospital = seeded();
    let t1 = team(&hospital, "T1");
    let t2 = team(&hospital, "T2");

    let bet = hospital
        .admit(Name::new("Ms", "Bet", "Lynch").unwrap(), Sex::F, dob("23/05/78"), t1)
        .unwrap()
        .unwrap();
    let ken = hospital
        .admit(Name::new("Mr", "Ken", "Barlow").unwrap(), Sex::M, dob("09/12/39"), t1)
        .unwrap()
        .unwrap();
    hospital
        .admit(Name::new("Ms", "Rita", "Sullivan").unwrap(), Sex::F, dob("15/01/50"), t2)
        .unwrap()
        .unwrap();

    let map = hospital.patients_and_wards(t1).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&bet.patient), Some(&bet.ward));
    assert_eq!(map.get(&ken.patient), Some(&ken.ward));

    let on_nightingale = hospital.patients_on(bet.ward).unwrap();
    assert_eq!(on_nightingale.len(), 2);
}

#[test]
fn test_read_views_do_not_leak_mutation() {
    let mut hospital = seeded();
    let t1 = team(&hospital, "T1");
    hospital
        .admit(Name::new("Ms", "Bet", "Lynch").unwrap(), Sex::F, dob("23/05/78"), t1)
        .unwrap()
        .unwrap();

    let mut patients = hospital.patients();
    patients.clear();
    let mut doctors = hospital.doctors_in(t1).unwrap();
    doctors.clear();
    let mut map = hospital.patients_and_wards(t1).unwrap();
    map.clear();

    assert_eq!(hospital.patients().len(), 1);
    assert_eq!(hospital.doctors_in(t1).unwrap().len(), 3);
    assert_eq!(hospital.patients_and_wards(t1).unwrap().len(), 1);
}
