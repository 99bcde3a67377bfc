use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use hecon_core::model::ParameterSpec;
use serde::Deserialize;

use super::DataError;

/// One raw row of the parameter table; the family stays free text until parsed
#[derive(Debug, Deserialize)]
struct ParameterRow {
    parameter: String,
    distribution: String,
    mean: f64,
    std: f64,
}

/// Read a parameter table from any CSV source
pub fn read_parameters<R: Read>(source: R, origin: &str) -> Result<Vec<ParameterSpec>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source);

    let mut specs = Vec::new();
    for (row, result) in reader.deserialize::<ParameterRow>().enumerate() {
        // Header is line 1
        let line = row + 2;
        let raw = result.map_err(|e| DataError::Csv(format!("{origin} line {line}: {e}")))?;
        let spec = ParameterSpec::parse(raw.parameter, &raw.distribution, raw.mean, raw.std)
            .map_err(|e| DataError::Parse(format!("{origin} line {line}: {e}")))?;
        specs.push(spec);
    }

    tracing::debug!(parameters = specs.len(), "loaded parameter table from {origin}");
    Ok(specs)
}

/// Load the parameter table CSV at `path`
pub fn load_parameters(path: &Path) -> Result<Vec<ParameterSpec>, DataError> {
    let file = File::open(path)
        .map_err(|e| DataError::Io(format!("Failed to open {}: {e}", path.display())))?;
    read_parameters(file, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecon_core::model::DistributionFamily;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_table_with_extra_columns() {
        let csv = "\
parameter,distribution,mean,std,source
p_remit_ect, beta ,0.55,0.05,trial A
c_session,Gamma,450,60,schedule
hr_relapse,lognorm,0.0,0.1,meta-analysis
";
        let specs = read_parameters(csv.as_bytes(), "inline").unwrap();

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].name, "p_remit_ect");
        assert_eq!(specs[0].distribution, DistributionFamily::Beta);
        assert_eq!(specs[1].distribution, DistributionFamily::Gamma);
        assert_eq!(specs[1].mean, 450.0);
        assert_eq!(specs[2].distribution, DistributionFamily::LogNormal);
    }

    #[test]
    fn test_unknown_family_reports_line() {
        let csv = "parameter,distribution,mean,std\na,normal,0,1\nb,weibull,1,1\n";
        let err = read_parameters(csv.as_bytes(), "params.csv").unwrap_err();
        match err {
            DataError::Parse(msg) => {
                assert!(msg.contains("params.csv line 3"));
                assert!(msg.contains("weibull"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let csv = "parameter,distribution,mean\na,normal,0\n";
        assert!(matches!(
            read_parameters(csv.as_bytes(), "inline"),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parameters.csv");
        fs::write(&path, "parameter,distribution,mean,std\nu,normal,0.8,0.05\n").unwrap();

        let specs = load_parameters(&path).unwrap();
        assert_eq!(specs[0].name, "u");

        let missing = load_parameters(&dir.path().join("nope.csv"));
        assert!(matches!(missing, Err(DataError::Io(_))));
    }
}
