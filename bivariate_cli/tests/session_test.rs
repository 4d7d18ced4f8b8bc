use approx::assert_relative_eq;
use bivariate_cli::{CommandError, Output, Scenario, Session, Settings};
use bivariate_engine::output::export_anydice_format;
use bivariate_engine::{ProbabilityError, Variable};
use pretty_assertions::assert_eq;

fn distributions(outputs: &[Output]) -> Vec<(&str, &bivariate_engine::DiscreteDistribution)> {
    outputs
        .iter()
        .filter_map(|output| match output {
            Output::Distribution { name, distribution } => Some((name.as_str(), distribution)),
            _ => None,
        })
        .collect()
}

/// Parses the `value,percent` lines of an exported distribution.
fn parse_export(exported: &str) -> (Vec<String>, Vec<(f64, f64)>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(exported.as_bytes());
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("export is valid CSV");
    let summary = records[0].iter().map(|s| s.to_string()).collect();
    assert_eq!(&records[1][0], "#");
    let rows = records[2..]
        .iter()
        .map(|r| (r[0].parse().unwrap(), r[1].parse().unwrap()))
        .collect();
    (summary, rows)
}

#[test]
fn test_heights_summary() {
    let outputs = Session::new().execute("heights").unwrap();
    let dists = distributions(&outputs);
    assert_eq!(
        dists.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
    assert!(dists[0].1.mean() > dists[1].1.mean());

    let exported = export_anydice_format(dists[0].0, dists[0].1);
    let (summary, rows) = parse_export(&exported);
    assert_eq!(summary[0], "A");
    assert_relative_eq!(summary[1].parse::<f64>().unwrap(), dists[0].1.mean());
    assert_eq!(rows.len(), 96);
    assert_eq!(rows[0].0, 154.0);
    let total = rows.iter().map(|(_, percent)| percent).sum::<f64>();
    assert_relative_eq!(total, 100.0, epsilon = 1e-6);
}

#[test]
fn test_heights_given() {
    let outputs = Session::new().execute("heights given 180").unwrap();
    let dists = distributions(&outputs);
    assert_eq!(dists.len(), 1);
    assert_eq!(dists[0].0, "B | A = 180");
    assert!(dists[0]
        .1
        .iter()
        .all(|(value, weight)| value < 180.0 || weight == 0.0));
}

#[test]
fn test_heights_given_off_grid() {
    let err = Session::new().execute("heights given 180.2").unwrap_err();
    match err {
        CommandError::Condition { source, .. } => {
            assert_eq!(source, ProbabilityError::ValueNotFound { value: 180.2 })
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_chess_summary() {
    let outputs = Session::new().execute("chess").unwrap();
    match &outputs[0] {
        Output::Text(text) => {
            let evidence = text
                .strip_prefix("Probability of the evidence: ")
                .unwrap()
                .parse::<f64>()
                .unwrap();
            assert_relative_eq!(evidence, 0.5, epsilon = 1e-9);
        }
        other => panic!("unexpected output {:?}", other),
    }
    let dists = distributions(&outputs);
    assert!(dists[0].1.mean() > 1600.0);
    assert!(dists[1].1.mean() < 1600.0);
}

#[test]
fn test_settings_change_the_grid() {
    let mut session = Session::new();
    session.execute("set height_step 1").unwrap();
    assert_eq!(session.settings().height_step, 1.0);
    let inference = session.infer(Scenario::Heights).unwrap();
    assert_eq!(inference.posterior.shape(), (48, 48));
    let a = inference.posterior.marginal(Variable::First);
    assert!(a.is_normalized());
}

#[test]
fn test_settings_listing() {
    let outputs = Session::with_settings(Settings {
        elo_mean: 1500.0,
        ..Settings::default()
    })
    .execute("settings")
    .unwrap();
    match &outputs[0] {
        Output::Text(text) => {
            assert!(text.contains("height_mean = 178"));
            assert!(text.contains("elo_mean = 1500"));
            assert_eq!(text.lines().count(), 8);
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn test_set_errors() {
    let mut session = Session::new();
    assert!(matches!(
        session.execute("set nope 1"),
        Err(CommandError::UnknownSetting { .. })
    ));
    assert!(matches!(
        session.execute("set height_std -1"),
        Err(CommandError::InvalidSetting { .. })
    ));
    assert!(matches!(
        session.execute("set height_std abc"),
        Err(CommandError::InvalidNumber { .. })
    ));
    assert!(matches!(
        session.execute("set height_std"),
        Err(CommandError::MissingArgument { .. })
    ));
    assert_eq!(session.settings(), &Settings::default());
}

#[test]
fn test_zero_evidence_surfaces() {
    // A span smaller than half a step leaves a single height, so nobody can be taller.
    let mut session = Session::new();
    session.execute("set height_span 0.1").unwrap();
    assert!(matches!(
        session.execute("heights"),
        Err(CommandError::Probability(ProbabilityError::ZeroEvidence))
    ));
}

#[test]
fn test_oversized_grid_is_an_error() {
    let mut session = Session::new();
    session.execute("set height_step 0.0001").unwrap();
    assert!(matches!(
        session.execute("heights"),
        Err(CommandError::Probability(
            ProbabilityError::InvalidDistribution { .. }
        ))
    ));
    // The session stays usable.
    session.execute("set height_step 0.5").unwrap();
    assert_eq!(session.execute("heights").unwrap().len(), 3);
}

#[test]
fn test_unknown_command_points_at_token() {
    let err = Session::new().execute("  flip coin").unwrap_err();
    match err {
        CommandError::UnknownCommand { range, name } => {
            assert_eq!(name, "flip");
            assert_eq!(range.offset(), 2);
            assert_eq!(range.len(), 4);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_table_and_joint() {
    let mut session = Session::new();
    session.execute("set height_step 4").unwrap();
    let outputs = session.execute("table heights").unwrap();
    match &outputs[0] {
        Output::Table(table) => {
            assert_eq!(table.data.len(), 3);
            assert_eq!(table.data[1][0], "A");
            assert_eq!(table.data[2][0], "B");
        }
        other => panic!("unexpected output {:?}", other),
    }

    let outputs = session.execute("joint heights").unwrap();
    match &outputs[0] {
        Output::Text(csv) => {
            // One header line plus one line per row value.
            assert_eq!(csv.lines().count(), 13);
            assert!(csv.starts_with(",154,158,"));
        }
        other => panic!("unexpected output {:?}", other),
    }
    assert!(matches!(
        session.execute("table dice"),
        Err(CommandError::UnknownScenario { .. })
    ));
}
