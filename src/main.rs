use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Serialize;
use ward_round::utils::{logger, validation::Validate};
use ward_round::{
    get_hospital, BirthDate, CliConfig, Command, Hospital, HospitalConfig, HospitalError, Name,
    SharedHospital, Sex,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.verbose, config.log_format);
    tracing::info!("Starting ward-round");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command(), &config) {
        let exit_code = match e.downcast_ref::<HospitalError>() {
            Some(err) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 Suggestion: {}", err.recovery_suggestion());
                if err.is_persistence() {
                    1
                } else {
                    2
                }
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                2
            }
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn run(command: Command, config: &HospitalConfig) -> anyhow::Result<()> {
    let hospital = get_hospital(config)?;

    match command {
        Command::Demo => demo(config)?,
        Command::Wards => print_wards(&hospital.lock()),
        Command::Teams => print_teams(&hospital.lock()),
        Command::Patients { json } => {
            let guard = hospital.lock();
            if json {
                let rows = patient_rows(&guard);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).map_err(HospitalError::from)?
                );
            } else {
                print_patients(&guard);
            }
        }
        Command::Admit {
            title,
            given,
            family,
            sex,
            dob,
            team,
        } => {
            let name = Name::new(title, given, family).map_err(|e| anyhow!(e))?;
            admit(&hospital, name, sex, dob, &team)?;
            hospital.save()?;
        }
        Command::Discharge { patient } => {
            match hospital.lock().discharge(patient) {
                Some(record) => println!("Discharged {}", record),
                None => println!("No admitted patient #{}", patient),
            }
            hospital.save()?;
        }
        Command::Treat { patient, doctor } => {
            hospital.lock().record_treatment(patient, doctor)?;
            println!("Recorded treatment of patient #{} by doctor #{}", patient, doctor);
            hospital.save()?;
        }
    }

    Ok(())
}

/// Walks through acquiring the hospital twice, admitting a patient and saving.
fn demo(config: &HospitalConfig) -> anyhow::Result<()> {
    let hospital1 = get_hospital(config)?;
    let hospital2 = get_hospital(config)?;

    if hospital1.same_instance(&hospital2) {
        println!("hospital1 and hospital2 reference the same object.");
    } else {
        println!("hospital1 and hospital2 reference different objects.");
    }

    println!("Initial details of hospital1:");
    println!("{}", *hospital1.lock());
    println!("Initial details of hospital2:");
    println!("{}", *hospital2.lock());

    println!("Initial patient details of hospital1:");
    print_patients(&hospital1.lock());
    println!("Initial patient details of hospital2:");
    print_patients(&hospital2.lock());

    let name = Name::new("Ms", "Bet", "Lynch").map_err(|e| anyhow!(e))?;
    let dob: BirthDate = "23/05/78".parse().map_err(|e: String| anyhow!(e))?;
    let team = hospital1
        .lock()
        .teams()
        .first()
        .map(|team| team.code().to_string())
        .context("the hospital has no teams to admit under")?;

    println!("Admitting a patient to hospital1...");
    admit(&hospital1, name, Sex::F, dob, &team)?;

    println!("Final patient details of hospital1:");
    print_patients(&hospital1.lock());
    println!("Final patient details of hospital2:");
    print_patients(&hospital2.lock());

    hospital1.save()?;
    hospital2.save()?;
    Ok(())
}

fn admit(
    hospital: &SharedHospital,
    name: Name,
    sex: Sex,
    dob: BirthDate,
    team_code: &str,
) -> anyhow::Result<()> {
    let mut guard = hospital.lock();
    let team = guard
        .team_id_by_code(team_code)
        .ok_or_else(|| HospitalError::invariant(format!("unknown team {}", team_code)))?;

    let display_name = name.to_string();
    match guard.admit(name, sex, dob, team)? {
        Some(placement) => {
            let ward = guard
                .ward(placement.ward)
                .map(|ward| ward.name().to_string())
                .unwrap_or_default();
            println!(
                "Admitted {} as patient #{} to ward {}",
                display_name, placement.patient, ward
            );
        }
        None => println!("No {} ward has a free bed for {}", sex, display_name),
    }
    Ok(())
}

fn print_wards(hospital: &Hospital) {
    for ward in hospital.wards() {
        println!(
            "{} ({}): {} of {} beds free",
            ward.name(),
            ward.kind(),
            ward.free_beds(),
            ward.capacity()
        );
    }
}

fn print_teams(hospital: &Hospital) {
    for team in hospital.teams() {
        println!("{}", team.code());
        for id in team.doctors() {
            if let Some(doctor) = hospital.doctor(*id) {
                println!("  #{} {}", id, doctor);
            }
        }
    }
}

fn print_patients(hospital: &Hospital) {
    let rows = patient_rows(hospital);
    if rows.is_empty() {
        println!("  (no patients)");
    }
    for row in rows {
        println!(
            "  #{} {} ({}, born {}) on {} under {}, consultant {}",
            row.id,
            row.name,
            row.sex,
            row.date_of_birth,
            row.ward,
            row.team,
            row.consultant
        );
    }
}

#[derive(Serialize)]
struct PatientRow {
    id: usize,
    name: String,
    sex: String,
    date_of_birth: String,
    ward: String,
    team: String,
    consultant: String,
    treated_by: Vec<String>,
}

fn patient_rows(hospital: &Hospital) -> Vec<PatientRow> {
    hospital
        .patients()
        .into_iter()
        .map(|patient| {
            let ward = patient
                .ward()
                .and_then(|id| hospital.ward(id))
                .map(|ward| ward.name().to_string())
                .unwrap_or_default();
            let team = hospital
                .team_of(patient.id())
                .map(|team| team.code().to_string())
                .unwrap_or_default();
            let consultant = hospital
                .consultant_of(patient.id())
                .map(|doctor| doctor.name().to_string())
                .unwrap_or_default();
            let treated_by = hospital
                .doctors_treating(patient.id())
                .map(|doctors| doctors.iter().map(|d| d.name().to_string()).collect())
                .unwrap_or_default();

            PatientRow {
                id: patient.id().index(),
                name: patient.name().to_string(),
                sex: patient.sex().to_string(),
                date_of_birth: patient.date_of_birth().to_string(),
                ward,
                team,
                consultant,
                treated_by,
            }
        })
        .collect()
}
