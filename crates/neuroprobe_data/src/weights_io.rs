//! Loading trained weights into a [`WeightStore`].

use std::path::Path;

use ndarray::{Array1, Array2};
use ndarray_npy::NpzReader;
use neuroprobe_core::WeightStore;

use crate::error::{DataError, Result};

/// Load weights from either a directory of per-layer JSON files or an `.npz` archive.
pub fn load_weights<P: AsRef<Path>>(path: P) -> Result<WeightStore> {
    let path = path.as_ref();
    if path.is_dir() {
        load_weights_json(path)
    } else {
        load_weights_npz(path)
    }
}

/// Load weights from `layer_0.json` … `layer_3.json` in `dir`.
///
/// Layer files hold, in order: `W1` as 784 rows of H values, `b1`,
/// `W2` as H rows of C values, and `b2`.
pub fn load_weights_json<P: AsRef<Path>>(dir: P) -> Result<WeightStore> {
    let dir = dir.as_ref();
    let w1 = matrix_from_rows(read_json(&dir.join("layer_0.json"))?, "layer_0")?;
    let b1 = Array1::from(read_json::<Vec<f32>>(&dir.join("layer_1.json"))?);
    let w2 = matrix_from_rows(read_json(&dir.join("layer_2.json"))?, "layer_2")?;
    let b2 = Array1::from(read_json::<Vec<f32>>(&dir.join("layer_3.json"))?);

    tracing::info!(dir = %dir.display(), "loaded JSON weights");
    Ok(WeightStore::new(w1, b1, w2, b2)?)
}

/// Load weights from an `.npz` archive holding `w1`, `b1`, `w2` and `b2`.
pub fn load_weights_npz<P: AsRef<Path>>(path: P) -> Result<WeightStore> {
    let file = std::fs::File::open(path.as_ref())?;
    let mut npz = NpzReader::new(file)
        .map_err(|e| DataError::FormatError(format!("Failed to read npz file: {}", e)))?;

    let w1: Array2<f32> = read_npz_array(&mut npz, "w1")?;
    let b1: Array1<f32> = read_npz_array(&mut npz, "b1")?;
    let w2: Array2<f32> = read_npz_array(&mut npz, "w2")?;
    let b2: Array1<f32> = read_npz_array(&mut npz, "b2")?;

    tracing::info!(path = %path.as_ref().display(), "loaded NPZ weights");
    Ok(WeightStore::new(w1, b1, w2, b2)?)
}

/// Read an array stored either as `name` or `name.npy`.
fn read_npz_array<D>(
    npz: &mut NpzReader<std::fs::File>,
    name: &str,
) -> Result<ndarray::Array<f32, D>>
where
    D: ndarray::Dimension,
{
    match npz.by_name(name) {
        Ok(array) => Ok(array),
        Err(_) => npz.by_name(&format!("{}.npy", name)).map_err(|e| {
            DataError::FormatError(format!("Failed to read '{}' from npz: {}", name, e))
        }),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| DataError::Parse(format!("{}: {}", path.display(), e)))
}

fn matrix_from_rows(rows: Vec<Vec<f32>>, name: &str) -> Result<Array2<f32>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(DataError::InvalidShape(format!(
            "{} has rows of differing length",
            name
        )));
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| DataError::InvalidShape(format!("{}: {}", name, e)))
}
