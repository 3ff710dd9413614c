use anyhow::{Result, anyhow};

/// A named float value stored for every vertex of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarAttribute {
    pub name: String,
    pub values: Vec<f64>,
}

/// The per-vertex attributes of a mesh, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub scalars: Vec<ScalarAttribute>,
}

impl Attributes {
    /// Add a scalar attribute, names must be unique.
    pub fn insert_scalar(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if self.scalar(name).is_some() {
            return Err(anyhow!("attribute `{name}` already exists"));
        }
        self.scalars.push(ScalarAttribute {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    pub fn scalar(&self, name: &str) -> Option<&[f64]> {
        self.scalars
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.values.as_slice())
    }

    pub fn names(&self) -> Vec<String> {
        self.scalars.iter().map(|a| a.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_attributes_unique() {
        let mut attributes = Attributes::default();
        attributes.insert_scalar("Measure1", vec![1.0, 2.0]).unwrap();
        attributes.insert_scalar("Measure2", vec![3.0, 4.0]).unwrap();
        assert!(attributes.insert_scalar("Measure1", vec![0.0, 0.0]).is_err());

        assert_eq!(attributes.names(), vec!["Measure1", "Measure2"]);
        assert_eq!(attributes.scalar("Measure2"), Some(&[3.0, 4.0][..]));
        assert_eq!(attributes.scalar("Measure3"), None);
    }
}
