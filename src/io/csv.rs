/*!
# Saving ABC results to CSV

One row per [`AbcResult`]: its position in the run, its distance, and one column per
parameter dimension. Samples are not written.
*/

use std::fs::File;

use csv::Writer;

use crate::core::AbcResult;
use crate::error::{AbcError, Result};

/**
Saves the distances and parameters of `results` as a CSV file.

The header is `index,distance,theta_0,...,theta_{k-1}`, where `k` is the dimension of
the first record. An empty slice produces a file with the header `index,distance` only.
NaN distances are written as `NaN`.

# Errors

Fails on I/O or CSV errors, and with [`AbcError::DimensionMismatch`] if records disagree
on the parameter dimension.

# Examples

```rust
use tabac::core::AbcResult;
use tabac::io::csv::save_results_csv;

let results = vec![AbcResult::new(0.5, vec![1.0, 2.0], ())];
save_results_csv(&results, "/tmp/tabac_results.csv").expect("Expecting saving results to succeed");
```
*/
pub fn save_results_csv<O>(results: &[AbcResult<O>], filename: &str) -> Result<()> {
    let n_dims = results.first().map_or(0, |r| r.theta().len());
    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut header: Vec<String> = vec!["index".to_string(), "distance".to_string()];
    header.extend((0..n_dims).map(|i| format!("theta_{}", i)));
    wtr.write_record(&header)?;

    for (idx, result) in results.iter().enumerate() {
        if result.theta().len() != n_dims {
            return Err(AbcError::DimensionMismatch {
                expected: n_dims,
                found: result.theta().len(),
            });
        }
        let mut row = vec![idx.to_string(), result.distance().to_string()];
        row.extend(result.theta().iter().map(|v| v.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
