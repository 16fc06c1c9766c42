//! Course portfolio persistence with file locking.
//!
//! The portfolio is the durable list of courses a user is planning against.
//! Saves are atomic so a crash mid-write never truncates the file.

use crate::{Course, Error, EvaluationRequest, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The stored set of courses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CoursePortfolio {
    pub courses: Vec<Course>,
}

impl CoursePortfolio {
    /// Load the portfolio from a file with shared locking
    ///
    /// Returns an empty portfolio if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty one.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No portfolio file found, starting empty");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open portfolio file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock portfolio file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read portfolio file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<CoursePortfolio>(&contents) {
            Ok(portfolio) => {
                tracing::debug!("Loaded portfolio from {:?}", path);
                Ok(portfolio)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse portfolio file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the portfolio to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // The temp file must live in the same directory for the rename to be atomic
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "portfolio path missing parent")
        })?)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old portfolio file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved portfolio to {:?}", path);
        Ok(())
    }

    /// Load the portfolio, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut CoursePortfolio) -> Result<()>,
    {
        let mut portfolio = Self::load(path)?;
        f(&mut portfolio)?;
        portfolio.save(path)?;
        Ok(portfolio)
    }

    /// Add a course, rejecting duplicate names
    pub fn add_course(&mut self, course: Course) -> Result<()> {
        if self
            .courses
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&course.name))
        {
            return Err(Error::Portfolio(format!(
                "course '{}' already exists",
                course.name
            )));
        }
        self.courses.push(course);
        Ok(())
    }

    /// Find a course by name (case-insensitive)
    pub fn course_mut(&mut self, name: &str) -> Option<&mut Course> {
        self.courses
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Remove a course by name, returning it
    pub fn remove_course(&mut self, name: &str) -> Result<Course> {
        let index = self
            .courses
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Portfolio(format!("no course named '{}'", name)))?;
        Ok(self.courses.remove(index))
    }

    /// The portfolio as a ranking request over all stored courses
    pub fn to_request(&self) -> EvaluationRequest {
        EvaluationRequest {
            courses: self.courses.clone(),
        }
    }
}
