use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn first_columns(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(|l| l.split('\t').take(2).collect::<Vec<_>>().join(" "))
        .collect()
}

#[test]
fn command_stats() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("msu")?;
    let output = cmd
        .arg("stats")
        .arg("tests/msu/blocks.csv")
        .arg("tests/msu/lengths.csv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(
        lines[0],
        "block_id,count,n_genomes,core,duplicated,category,len"
    );
    let order: Vec<&str> = lines[1..]
        .iter()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(order, vec!["A", "B", "D", "C", "E", "P", "Q", "R"]);
    assert!(lines[1].starts_with("A,2,2,true,false,core,"), "A");
    assert!(lines[8].starts_with("R,3,2,false,true,duplicated,"), "R");

    Ok(())
}

#[test]
fn command_dotplot() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("msu")?;
    let output = cmd
        .arg("dotplot")
        .arg("tests/msu/blocks.csv")
        .arg("tests/msu/lengths.csv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.starts_with(
        "category\tblock_id\tstrand1\tocc1\tstrand2\tocc2\tx_start\tx_end\ty_start\ty_end\n"
    ));
    assert_eq!(
        first_columns(&stdout),
        vec![
            "fwd A",
            "fwd A",
            "fwd B",
            "inverted C",
            "dupl R",
            "dupl R",
            "fwd D",
            "fwd E",
            "private_gA P",
            "private_gB Q",
        ]
    );

    Ok(())
}

#[test]
fn command_dotplot_msu() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let msu = temp.path().join("msu.csv");

    let mut cmd = Command::cargo_bin("msu")?;
    cmd.arg("glue")
        .arg("tests/msu/blocks.csv")
        .arg("-o")
        .arg(&msu)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("msu")?;
    let output = cmd
        .arg("dotplot")
        .arg("tests/msu/blocks.csv")
        .arg("tests/msu/lengths.csv")
        .arg("--msu")
        .arg(&msu)
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(
        first_columns(&stdout),
        vec![
            "msu_1 A",
            "msu_1 A",
            "msu_1 B",
            "msu_2 C",
            "msu_3 R",
            "msu_3 D",
            "msu_1 E",
            "private_gA P",
            "private_gB Q",
        ]
    );

    Ok(())
}

#[test]
fn command_dotplot_missing_length() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let lengths = temp.path().join("lengths.csv");
    std::fs::write(&lengths, "id,length\ngA,1000\n")?;

    let mut cmd = Command::cargo_bin("msu")?;
    cmd.arg("dotplot")
        .arg("tests/msu/blocks.csv")
        .arg(&lengths)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No length for genome: gB"));

    Ok(())
}
