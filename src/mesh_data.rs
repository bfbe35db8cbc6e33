use ndarray::{Array1, Array2, Axis as NdAxis};

use crate::Error;

/// A labelled, strictly monotonic sample axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    /// Unit of `values`, e.g. "s", "rad/s", "m".
    pub unit: String,
    pub values: Array1<f64>,
}

impl Axis {
    pub fn new(label: impl Into<String>, unit: impl Into<String>, values: Array1<f64>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            values,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn is_monotonic(&self) -> bool {
        let increasing = self.values.windows(2).into_iter().all(|w| w[1] > w[0]);
        increasing || self.values.windows(2).into_iter().all(|w| w[1] < w[0])
    }
}

/// A 2-D result with two axes; `data` has shape `(axes[0].len(), axes[1].len())`.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    axes: [Axis; 2],
    data: Array2<f64>,
}

impl MeshData {
    /// Creates a new `MeshData`, checking the matrix shape against the axes.
    pub fn new(data: Array2<f64>, axis0: Axis, axis1: Axis) -> Result<Self, Error> {
        let (rows, cols) = data.dim();
        if rows != axis0.len() {
            return Err(Error::DimensionMismatch {
                array_name: axis0.label.clone(),
                input_length: axis0.len(),
                expected_length: rows,
            });
        }
        if cols != axis1.len() {
            return Err(Error::DimensionMismatch {
                array_name: axis1.label.clone(),
                input_length: axis1.len(),
                expected_length: cols,
            });
        }
        for axis in [&axis0, &axis1] {
            if !axis.is_monotonic() {
                return Err(Error::NonMonotonicAxis { axis: axis.label.clone() });
            }
        }

        Ok(Self {
            axes: [axis0, axis1],
            data,
        })
    }

    #[inline]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
    #[inline]
    pub fn axes(&self) -> &[Axis; 2] {
        &self.axes
    }
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Largest value in the matrix, zero when empty.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Row and column of the largest value.
    pub fn argmax(&self) -> Option<(usize, usize)> {
        self.data
            .indexed_iter()
            .fold(None, |best: Option<((usize, usize), f64)>, (idx, &v)| match best {
                Some((_, max)) if max >= v => best,
                _ => Some((idx, v)),
            })
            .map(|(idx, _)| idx)
    }

    /// Copy scaled so the maximum is one. An all-zero mesh is returned unchanged.
    pub fn normalized(&self) -> Self {
        let max = self.max();
        let data = if max > 0.0 {
            self.data.mapv(|v| v / max)
        } else {
            self.data.clone()
        };
        Self {
            axes: self.axes.clone(),
            data,
        }
    }

    /// Sums along each axis: one value per `axes[0]` sample, one per `axes[1]` sample.
    pub fn marginals(&self) -> (Array1<f64>, Array1<f64>) {
        (self.data.sum_axis(NdAxis(1)), self.data.sum_axis(NdAxis(0)))
    }

    /// Writes both axes and the matrix into `group`.
    pub fn save(&self, group: &hdf5::Group) -> Result<(), Error> {
        for (i, axis) in self.axes.iter().enumerate() {
            let dataset = group
                .new_dataset::<f64>()
                .shape(axis.len())
                .create(format!("axis{}", i).as_str())?;
            dataset.write(&axis.values)?;

            for (name, value) in [("label", &axis.label), ("unit", &axis.unit)] {
                let value: hdf5::types::VarLenUnicode = value.parse()?;
                dataset
                    .new_attr::<hdf5::types::VarLenUnicode>()
                    .shape(hdf5::Extents::Scalar)
                    .create(name)?
                    .write_scalar(&value)?;
            }
        }

        group
            .new_dataset::<f64>()
            .shape(self.data.dim())
            .create("data")?
            .write(&self.data)?;

        Ok(())
    }
}
