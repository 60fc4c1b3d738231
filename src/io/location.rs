use crate::error::Error;
use crate::io::chromosome::Chromosome;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A 1-based, closed interval on a chromosome.
///
/// Ordering is by chromosome, then start, then stop.
#[derive(PartialEq, PartialOrd, Eq, Ord, Hash, Clone, Debug)]
pub struct GenomeLoc {
    chromosome: Chromosome,
    start: u64,
    stop: u64,
}

impl GenomeLoc {
    pub fn new(chromosome: Chromosome, start: u64, stop: u64) -> Result<Self, Error> {
        if stop < start {
            return Err(Error::InvalidLocation(format!(
                "{}:{}-{}",
                chromosome, start, stop
            )));
        }
        Ok(Self {
            chromosome,
            start,
            stop,
        })
    }

    pub fn point(chromosome: Chromosome, position: u64) -> Self {
        Self {
            chromosome,
            start: position,
            stop: position,
        }
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn is_point(&self) -> bool {
        self.start == self.stop
    }

    pub fn overlaps(&self, other: &GenomeLoc) -> bool {
        self.chromosome == other.chromosome && self.start <= other.stop && other.start <= self.stop
    }

    pub fn contains(&self, other: &GenomeLoc) -> bool {
        self.chromosome == other.chromosome && self.start <= other.start && other.stop <= self.stop
    }
}

fn parse_position(s: &str, input: &str) -> Result<u64, Error> {
    s.trim()
        .replace(',', "")
        .parse()
        .map_err(|_| Error::InvalidLocation(input.to_owned()))
}

impl FromStr for GenomeLoc {
    type Err = Error;

    /// Parses `chrom:pos` or `chrom:start-stop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chrom, range) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidLocation(s.to_owned()))?;
        let chromosome: Chromosome = chrom.parse()?;
        match range.split_once('-') {
            Some((start, stop)) => {
                GenomeLoc::new(chromosome, parse_position(start, s)?, parse_position(stop, s)?)
            }
            None => Ok(GenomeLoc::point(chromosome, parse_position(range, s)?)),
        }
    }
}

impl Display for GenomeLoc {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.is_point() {
            write!(f, "{}:{}", self.chromosome, self.start)
        } else {
            write!(f, "{}:{}-{}", self.chromosome, self.start, self.stop)
        }
    }
}

impl Serialize for GenomeLoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
