use crate::error::Error;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A chromosome code as used in plink files.
///
/// Variant order defines the sort order: numbered autosomes first,
/// then the sex chromosomes, mitochondria, named contigs, and finally
/// variants that are not placed on any chromosome (code `0`).
#[derive(PartialEq, PartialOrd, Eq, Ord, Hash, Clone, Debug)]
pub enum Chromosome {
    Autosome(u16),
    X,
    Y,
    XY,
    MT,
    Contig(String),
    Unplaced,
}

impl FromStr for Chromosome {
    type Err = Error;

    fn from_str(input: &str) -> Result<Chromosome, Self::Err> {
        let code = input.trim();
        let code = match code.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &code[3..],
            _ => code,
        };
        if code.is_empty() {
            return Err(Error::InvalidLocation(input.to_owned()));
        }
        if let Ok(num) = code.parse::<u16>() {
            return Ok(match num {
                0 => Chromosome::Unplaced,
                23 => Chromosome::X,
                24 => Chromosome::Y,
                25 => Chromosome::XY,
                26 => Chromosome::MT,
                n => Chromosome::Autosome(n),
            });
        }
        match code {
            "X" | "x" => Ok(Chromosome::X),
            "Y" | "y" => Ok(Chromosome::Y),
            "XY" | "xy" => Ok(Chromosome::XY),
            "M" | "MT" | "m" | "mt" => Ok(Chromosome::MT),
            other => Ok(Chromosome::Contig(other.to_owned())),
        }
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Chromosome::Autosome(n) => write!(f, "{}", n),
            Chromosome::X => write!(f, "X"),
            Chromosome::Y => write!(f, "Y"),
            Chromosome::XY => write!(f, "XY"),
            Chromosome::MT => write!(f, "MT"),
            Chromosome::Contig(name) => write!(f, "{}", name),
            Chromosome::Unplaced => write!(f, "0"),
        }
    }
}

impl Serialize for Chromosome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Chromosome;

    #[test]
    fn parse_plink_codes() {
        assert_eq!("1".parse::<Chromosome>().unwrap(), Chromosome::Autosome(1));
        assert_eq!("chr22".parse::<Chromosome>().unwrap(), Chromosome::Autosome(22));
        assert_eq!("23".parse::<Chromosome>().unwrap(), Chromosome::X);
        assert_eq!("24".parse::<Chromosome>().unwrap(), Chromosome::Y);
        assert_eq!("XY".parse::<Chromosome>().unwrap(), Chromosome::XY);
        assert_eq!("chrM".parse::<Chromosome>().unwrap(), Chromosome::MT);
        assert_eq!("0".parse::<Chromosome>().unwrap(), Chromosome::Unplaced);
        assert_eq!(
            "scaffold_7".parse::<Chromosome>().unwrap(),
            Chromosome::Contig("scaffold_7".to_owned())
        );
        assert!("".parse::<Chromosome>().is_err());
    }

    #[test]
    fn numeric_order_not_lexicographic() {
        let mut chroms: Vec<Chromosome> = ["X", "10", "2", "0", "MT", "1"]
            .iter()
            .map(|c| c.parse().unwrap())
            .collect();
        chroms.sort();
        let names: Vec<String> = chroms.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["1", "2", "10", "X", "MT", "0"]);
    }
}
