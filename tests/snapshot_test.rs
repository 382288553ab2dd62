use std::fs;
use tempfile::tempdir;
use ward_round::core::loader::load_setup_from_reader;
use ward_round::core::registry::open_hospital;
use ward_round::{FileSnapshotStore, Hospital, HospitalError, Name, Sex};

const SETUP: &str = "\
Ward,Nightingale,F,4
Ward,Fleming,M,3
Team,T1
Consultant,Dr,John,Smith
Junior,Dr,Ann,Jones,Foundation1
Patient,Mrs,Elsie,Tanner,F,12/03/40
Team,T2
Consultant,Dr,Mary,Brown
Junior,Dr,Raj,Patel,Foundation1
Patient,Mr,Ken,Barlow,M,09/12/39
";

fn busy_hospital() -> Hospital {
    let mut hospital = Hospital::new();
    load_setup_from_reader(&mut hospital, SETUP.as_bytes()).unwrap();

    let t1 = hospital.team_id_by_code("T1").unwrap();
    let bet = hospital
        .admit(
            Name::new("Ms", "Bet", "Lynch").unwrap(),
            Sex::F,
            "23/05/78".parse().unwrap(),
            t1,
        )
        .unwrap()
        .unwrap();
    let jones = hospital
        .find_doctor(&Name::new("Dr", "Ann", "Jones").unwrap())
        .unwrap();
    hospital.record_treatment(bet.patient, jones).unwrap();
    hospital
}

#[test]
fn test_save_and_restore_preserves_the_graph() {
    let dir = tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("Hospital.data"));
    let hospital = busy_hospital();

    hospital.save_to(&store).unwrap();
    let restored = Hospital::restore_from(&store).unwrap();

    assert_eq!(restored, hospital);
    restored.check_invariants().unwrap();

    let bet = restored.find_patients(&Name::new("Ms", "Bet", "Lynch").unwrap())[0].id();
    let ward = restored.ward(restored.patient(bet).unwrap().ward().unwrap()).unwrap();
    let team = restored.team_of(bet).unwrap();
    assert!(ward.contains(bet));
    assert!(team.patients().contains(&bet));
    assert_eq!(restored.doctors_treating(bet).unwrap().len(), 1);
}

#[test]
fn test_restored_hospital_keeps_allocating_fresh_ids() {
    let dir = tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("Hospital.data"));
    let mut hospital = busy_hospital();
    let elsie = hospital.find_patients(&Name::new("Mrs", "Elsie", "Tanner").unwrap())[0].id();
    hospital.discharge(elsie).unwrap();
    hospital.save_to(&store).unwrap();

    let mut restored = Hospital::restore_from(&store).unwrap();
    let t2 = restored.team_id_by_code("T2").unwrap();
    let placement = restored
        .admit(
            Name::new("Ms", "Rita", "Sullivan").unwrap(),
            Sex::F,
            "15/01/50".parse().unwrap(),
            t2,
        )
        .unwrap()
        .unwrap();

    assert_ne!(placement.patient, elsie);
    assert!(restored
        .patients()
        .iter()
        .all(|patient| patient.id() <= placement.patient));
    restored.check_invariants().unwrap();
}

#[test]
fn test_save_replaces_previous_snapshot() {
    let dir = tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("Hospital.data"));
    let mut hospital = busy_hospital();
    hospital.save_to(&store).unwrap();

    let ken = hospital.find_patients(&Name::new("Mr", "Ken", "Barlow").unwrap())[0].id();
    hospital.discharge(ken).unwrap();
    hospital.save_to(&store).unwrap();

    let restored = Hospital::restore_from(&store).unwrap();
    assert!(restored.patient(ken).is_none());
    assert_eq!(restored, hospital);
    assert!(!dir.path().join("Hospital.data.tmp").exists());
}

#[test]
fn test_open_hospital_prefers_snapshot_over_setup() {
    let dir = tempdir().unwrap();
    let setup = dir.path().join("hospital.csv");
    fs::write(&setup, SETUP).unwrap();
    let store = FileSnapshotStore::new(dir.path().join("Hospital.data"));

    let saved = busy_hospital();
    saved.save_to(&store).unwrap();

    let opened = open_hospital(&store, &setup).unwrap();
    assert_eq!(opened, saved);
    assert_eq!(opened.patients().len(), 3);
}

#[test]
fn test_corrupt_snapshot_falls_back_to_setup() {
    let dir = tempdir().unwrap();
    let setup = dir.path().join("hospital.csv");
    fs::write(&setup, SETUP).unwrap();
    let store = FileSnapshotStore::new(dir.path().join("Hospital.data"));
    fs::write(store.path(), b"WRDRND01 truncated").unwrap();

    assert!(matches!(
        Hospital::restore_from(&store),
        Err(HospitalError::SnapshotCorrupt { .. })
    ));

    let opened = open_hospital(&store, &setup).unwrap();
    assert_eq!(opened.patients().len(), 2);
    assert_eq!(Hospital::restore_from(&store).unwrap(), opened);
}
