use anyhow::Result;
use assert_cmd::Command;
use calamine::{open_workbook, Data, Reader, Xlsx};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FULL_HEADER: &str = "Nombre de la campaña,Estado de la entrega,\
Importe gastado (EUR),Clientes potenciales de Meta,\
Identificador del conjunto de anuncios";

fn metafilter() -> Command {
    Command::cargo_bin("metafilter").unwrap()
}

#[test]
fn no_arguments_shows_help() {
    metafilter()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_selection_is_rejected_with_exit_code_2() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        format!("{FULL_HEADER}\nMedicina España Leads,active,1,0,111\n"),
    )?;

    metafilter()
        .arg(&input)
        .arg("--output-format")
        .arg("plain")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("must be selected"));

    Ok(())
}

#[test]
fn unknown_country_names_the_offender() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        format!("{FULL_HEADER}\nMedicina España Leads,active,1,0,111\n"),
    )?;

    metafilter()
        .arg(&input)
        .args(["--paises", "Atlantida", "--facultades", "Medicina"])
        .args(["--output-format", "plain"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Atlantida"));

    Ok(())
}

#[test]
fn end_to_end_filter_writes_xlsx() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        format!(
            "{FULL_HEADER}\n\
             Medicina España Leads,active,1,0,120211491962260403\n\
             Medicina España Cara,active,9,0,120211491962260404\n\
             Derecho Chile,active,1,0,120211491962260405\n"
        ),
    )?;
    let output = dir.path().join("filtrados.xlsx");

    metafilter()
        .arg(&input)
        .args(["--paises", "España", "--facultades", "Medicina"])
        .args(["--max-eur", "2", "--max-mxn", "41"])
        .args(["--output-format", "plain"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("MATCHED: 1 of 3"));

    let mut workbook: Xlsx<_> = open_workbook(&output)?;
    let range = workbook.worksheet_range("Sheet1")?;
    let rows: Vec<_> = range.rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0].to_string(), "Nombre de la campaña");
    assert_eq!(rows[1][1], Data::String("España".to_string()));
    assert_eq!(rows[1][2], Data::String("Medicina".to_string()));
    assert_eq!(
        rows[1][3],
        Data::String("120211491962260403".to_string())
    );

    Ok(())
}

#[test]
fn no_matching_records_exits_6_without_output() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        format!("{FULL_HEADER}\nMedicina España Leads,paused,1,0,111\n"),
    )?;
    let output = dir.path().join("filtrados.xlsx");

    metafilter()
        .arg(&input)
        .args(["--paises", "España", "--facultades", "Medicina"])
        .args(["--output-format", "plain"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(6);

    assert!(!output.exists());
    Ok(())
}

#[test]
fn dry_run_reports_classification_and_writes_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        format!("{FULL_HEADER}\nVeterinaria Portugal,active,1,0,111\n"),
    )?;

    metafilter()
        .arg(&input)
        .arg("--dry-run")
        .args(["--output-format", "plain"])
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("Portugal"));

    assert!(!dir.path().join("filtrados.xlsx").exists());
    Ok(())
}

#[test]
fn list_paises_prints_vocabulary() {
    metafilter()
        .arg("--list-paises")
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("España"))
        .stdout(predicate::str::contains("República Dominicana"));
}

#[test]
fn existing_output_requires_force() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        format!("{FULL_HEADER}\nMedicina España Leads,active,1,0,111\n"),
    )?;
    let output = dir.path().join("filtrados.xlsx");
    fs::write(&output, "already here")?;

    let base_args = |cmd: &mut Command| {
        cmd.arg(&input)
            .args(["--paises", "España", "--facultades", "Medicina"])
            .args(["--output-format", "plain"])
            .arg("-o")
            .arg(&output);
    };

    let mut cmd = metafilter();
    base_args(&mut cmd);
    cmd.assert().failure().code(8);

    let mut cmd = metafilter();
    base_args(&mut cmd);
    cmd.arg("--force").assert().success();

    Ok(())
}

#[test]
fn skipped_file_does_not_stop_the_batch() -> Result<()> {
    let dir = TempDir::new()?;
    let bad = dir.path().join("bad.csv");
    fs::write(&bad, "Estado de la entrega\nactive\n")?;
    let good = dir.path().join("good.csv");
    fs::write(
        &good,
        format!("{FULL_HEADER}\nMedicina España Leads,active,1,0,111\n"),
    )?;
    let output = dir.path().join("filtrados.xlsx");

    metafilter()
        .arg(dir.path())
        .args(["--paises", "España", "--facultades", "Medicina"])
        .args(["--output-format", "plain"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("bad.csv"))
        .stdout(predicate::str::contains("MATCHED: 1 of 1"));

    Ok(())
}
