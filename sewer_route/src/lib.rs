//! Routes through a sewer network and the pipe profiles seen along them.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use log::debug;
use serde::{Deserialize, Serialize};
use side_view::io::read_lines;
use side_view::{Profile, ProfileError};
use thiserror::Error;

/// Unit of all pipe levels.
pub const LEVEL_UNIT: &str = "m AD";

const LOCATE_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("segment {segment} refers to unknown pipe '{pipe}'")]
    UnknownPipe { segment: usize, pipe: String },
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Sewer connection between two manholes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: String,
    pub from: String,
    pub to: String,
    pub length: f64,
    /// Invert level at the `from` end.
    pub level_source: f64,
    /// Invert level at the `to` end.
    pub level_target: f64,
    /// Height of the cross section above the invert.
    #[serde(default)]
    pub height: f64,
}

/// Invert level at `chainage` along the pipe, linear between both ends.
pub fn level_at_chainage(pipe: &Pipe, chainage: f64) -> f64 {
    if pipe.length <= 0.0 {
        return pipe.level_source.min(pipe.level_target);
    }
    let t = chainage / pipe.length;
    pipe.level_source + t * (pipe.level_target - pipe.level_source)
}

/// Part of a pipe traversed by a route, from `chainage` to `end_chainage`.
///
/// A segment running against the pipe direction has `end_chainage < chainage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub pipe: String,
    pub chainage: f64,
    pub end_chainage: f64,
}

impl Segment {
    pub fn length(&self) -> f64 {
        (self.end_chainage - self.chainage).abs()
    }

    pub fn is_positive(&self) -> bool {
        self.end_chainage >= self.chainage
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub pipes: Vec<Pipe>,
    pub segments: Vec<Segment>,
}

/// Where a water level lies relative to a pipe cross section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelLocation {
    Above,
    Inside,
    Below,
}

/// Water level at a route offset together with the pipe it falls in.
#[derive(Debug, Clone, Copy)]
struct PipeLevel<'a> {
    pipe: &'a Pipe,
    segment: usize,
    offset: f64,
    bottom: f64,
    water_level: f64,
}

impl PipeLevel<'_> {
    fn top(&self) -> f64 {
        self.bottom + self.pipe.height
    }

    fn location(&self) -> LevelLocation {
        if self.water_level > self.top() {
            LevelLocation::Above
        } else if self.water_level < self.bottom {
            LevelLocation::Below
        } else {
            LevelLocation::Inside
        }
    }

    /// Water level limited to the pipe cross section.
    fn level_in_pipe(&self) -> f64 {
        self.water_level.max(self.bottom).min(self.top())
    }
}

/// Point where the water level line from `a` to `b` meets the pipe line
/// running from `a_level` to `b_level`. `None` for parallel lines.
fn intersect(a: &PipeLevel, b: &PipeLevel, a_level: f64, b_level: f64) -> Option<(f64, f64)> {
    let d0 = a.water_level - a_level;
    let d1 = b.water_level - b_level;
    if (d0 - d1).abs() < f64::EPSILON {
        return None;
    }
    let t = d0 / (d0 - d1);
    Some((
        a.offset + t * (b.offset - a.offset),
        a_level + t * (b_level - a_level),
    ))
}

/// Points where the water level passes the pipe top or bottom between two
/// positions, ordered by route offset.
fn crossings(previous: &PipeLevel, current: &PipeLevel) -> Vec<(f64, f64)> {
    use LevelLocation::*;
    let (top, bottom) = match (previous.location(), current.location()) {
        (Above, Inside) | (Inside, Above) => (true, false),
        (Above, Below) | (Below, Above) => (true, true),
        (Inside, Below) | (Below, Inside) => (false, true),
        _ => (false, false),
    };
    let mut points = Vec::new();
    if top {
        points.extend(intersect(previous, current, previous.top(), current.top()));
    }
    if bottom {
        points.extend(intersect(previous, current, previous.bottom, current.bottom));
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

/// Consecutive segments on the same pipe.
struct PipeRun<'a> {
    pipe: &'a Pipe,
    chainage: f64,
    end_chainage: f64,
    offset: f64,
    length: f64,
}

impl Route {
    pub fn pipe_index(&self) -> HashMap<&str, usize> {
        let mut map = HashMap::new();
        for (i, p) in self.pipes.iter().enumerate() {
            map.insert(p.id.as_str(), i);
        }
        map
    }

    /// Total length of the route.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    fn segment_pipe<'a>(
        &'a self,
        index: &HashMap<&str, usize>,
        segment: usize,
    ) -> Result<&'a Pipe, RouteError> {
        let id = &self.segments[segment].pipe;
        index
            .get(id.as_str())
            .map(|&i| &self.pipes[i])
            .ok_or_else(|| RouteError::UnknownPipe {
                segment,
                pipe: id.clone(),
            })
    }

    fn pipe_runs(&self) -> Result<Vec<PipeRun<'_>>, RouteError> {
        let index = self.pipe_index();
        let mut runs: Vec<PipeRun> = Vec::new();
        let mut offset = 0.0;
        for (i, seg) in self.segments.iter().enumerate() {
            let pipe = self.segment_pipe(&index, i)?;
            let length = seg.length();
            if let Some(run) = runs.last_mut().filter(|run| run.pipe.id == pipe.id) {
                run.end_chainage = seg.end_chainage;
                run.length += length;
            } else {
                runs.push(PipeRun {
                    pipe,
                    chainage: seg.chainage,
                    end_chainage: seg.end_chainage,
                    offset,
                    length,
                });
            }
            offset += length;
        }
        Ok(runs)
    }

    /// Top and bottom of the pipes along the route.
    ///
    /// Every pipe contributes its levels at the route offsets where the
    /// route enters and leaves it.
    pub fn pipe_profiles(&self) -> Result<(Profile, Profile), RouteError> {
        let runs = self.pipe_runs()?;
        let mut offsets = Vec::with_capacity(2 * runs.len());
        let mut top = Vec::with_capacity(2 * runs.len());
        let mut bottom = Vec::with_capacity(2 * runs.len());
        for run in &runs {
            let start = level_at_chainage(run.pipe, run.chainage);
            let end = level_at_chainage(run.pipe, run.end_chainage);
            offsets.push(run.offset);
            bottom.push(start);
            top.push(start + run.pipe.height);
            offsets.push(run.offset + run.length);
            bottom.push(end);
            top.push(end + run.pipe.height);
        }
        debug!("pipe profiles for {} pipes along route", runs.len());
        Ok((
            Profile::new("Pipe top", LEVEL_UNIT, offsets.clone(), top)?,
            Profile::new("Pipe bottom", LEVEL_UNIT, offsets, bottom)?,
        ))
    }

    /// Nodes where the route passes from one pipe into the next, with
    /// the route offset of each.
    pub fn node_chainages(&self) -> Result<Vec<(String, f64)>, RouteError> {
        let index = self.pipe_index();
        let mut nodes = Vec::new();
        let mut offset = 0.0;
        for i in 1..self.segments.len() {
            let previous = &self.segments[i - 1];
            let current = &self.segments[i];
            offset += previous.length();
            if previous.pipe == current.pipe {
                continue;
            }
            let previous_pipe = self.segment_pipe(&index, i - 1)?;
            let current_pipe = self.segment_pipe(&index, i)?;
            let left = if previous.is_positive() {
                &previous_pipe.to
            } else {
                &previous_pipe.from
            };
            let entered = if current.is_positive() {
                &current_pipe.from
            } else {
                &current_pipe.to
            };
            if left == entered {
                nodes.push((entered.clone(), offset));
            }
        }
        Ok(nodes)
    }

    /// Water level as seen inside the pipes along the route.
    ///
    /// `water_level` is sampled at route offsets. Levels are limited to the
    /// pipe cross section, with extra points where the level passes the
    /// pipe top or bottom and at the end of each pipe left by the route.
    /// Offsets outside the route and missing levels are skipped.
    pub fn water_level_in_pipe(&self, water_level: &Profile) -> Result<Profile, RouteError> {
        let index = self.pipe_index();
        let mut offsets = Vec::new();
        let mut levels = Vec::new();
        let mut previous: Option<PipeLevel> = None;
        for (offset, level) in water_level.points() {
            if level.is_nan() {
                continue;
            }
            let Some((segment, chainage)) = self.locate(offset) else {
                continue;
            };
            let pipe = self.segment_pipe(&index, segment)?;
            let current = PipeLevel {
                pipe,
                segment,
                offset,
                bottom: level_at_chainage(pipe, chainage),
                water_level: level,
            };
            if let Some(mut prev) = previous {
                if prev.pipe.id != current.pipe.id {
                    let bottom = if self.segments[prev.segment].is_positive() {
                        prev.pipe.level_target
                    } else {
                        prev.pipe.level_source
                    };
                    let end = PipeLevel {
                        bottom,
                        offset: current.offset,
                        water_level: current.water_level,
                        ..prev
                    };
                    for (x, y) in crossings(&prev, &end) {
                        offsets.push(x);
                        levels.push(y);
                    }
                    offsets.push(end.offset);
                    levels.push(end.level_in_pipe());
                    prev = end;
                }
                for (x, y) in crossings(&prev, &current) {
                    offsets.push(x);
                    levels.push(y);
                }
            }
            offsets.push(current.offset);
            levels.push(current.level_in_pipe());
            previous = Some(current);
        }
        debug!("water level in pipe: {} points", offsets.len());
        Ok(Profile::new("Waterlevel in pipe", LEVEL_UNIT, offsets, levels)?)
    }

    /// Segment index and pipe chainage at a route offset.
    ///
    /// An offset on the boundary between two segments resolves to the
    /// start of the next one. Returns `None` beyond either end of the route.
    pub fn locate(&self, offset: f64) -> Option<(usize, f64)> {
        let mut start = 0.0;
        let last = self.segments.len().checked_sub(1)?;
        for (i, seg) in self.segments.iter().enumerate() {
            let end = start + seg.length();
            if offset < start - LOCATE_TOLERANCE || offset > end + LOCATE_TOLERANCE {
                start = end;
                continue;
            }
            if (offset - start).abs() < LOCATE_TOLERANCE {
                return Some((i, seg.chainage));
            }
            if (offset - end).abs() < LOCATE_TOLERANCE {
                if i == last {
                    return Some((i, seg.end_chainage));
                }
                return Some((i + 1, self.segments[i + 1].chainage));
            }
            let along = offset - start;
            let chainage = if seg.is_positive() {
                seg.chainage + along
            } else {
                seg.chainage - along
            };
            return Some((i, chainage));
        }
        None
    }
}

fn invalid(line_no: usize, message: impl std::fmt::Display) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("line {}: {}", line_no, message),
    )
}

fn parse_f64(field: &str, line_no: usize) -> io::Result<f64> {
    field.trim().parse().map_err(|e| invalid(line_no, e))
}

fn read_pipes(path: &str) -> io::Result<Vec<Pipe>> {
    let mut pipes = Vec::new();
    for (idx, line) in read_lines(path)?.iter().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 6 {
            return Err(invalid(
                idx + 1,
                "expected id,from,to,length,level_source,level_target[,height]",
            ));
        }
        let height = match parts.get(6) {
            Some(h) => parse_f64(h, idx + 1)?,
            None => 0.0,
        };
        pipes.push(Pipe {
            id: parts[0].trim().to_string(),
            from: parts[1].trim().to_string(),
            to: parts[2].trim().to_string(),
            length: parse_f64(parts[3], idx + 1)?,
            level_source: parse_f64(parts[4], idx + 1)?,
            level_target: parse_f64(parts[5], idx + 1)?,
            height,
        });
    }
    Ok(pipes)
}

fn read_segments(path: &str, known: &HashSet<&str>) -> io::Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for (idx, line) in read_lines(path)?.iter().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 3 {
            return Err(invalid(idx + 1, "expected pipe,chainage,end_chainage"));
        }
        let pipe = parts[0].trim();
        if !known.contains(pipe) {
            return Err(invalid(idx + 1, format!("unknown pipe '{}'", pipe)));
        }
        segments.push(Segment {
            pipe: pipe.to_string(),
            chainage: parse_f64(parts[1], idx + 1)?,
            end_chainage: parse_f64(parts[2], idx + 1)?,
        });
    }
    Ok(segments)
}

fn in_file(path: &str, e: io::Error) -> io::Error {
    io::Error::new(e.kind(), format!("{}: {}", path, e))
}

/// Reads pipes (`id,from,to,length,level_source,level_target[,height]`)
/// and segments (`pipe,chainage,end_chainage`) from two CSV files.
///
/// Errors name the file they come from.
pub fn read_route_csv(pipes: &str, segments: &str) -> io::Result<Route> {
    let pipe_list = read_pipes(pipes).map_err(|e| in_file(pipes, e))?;
    let known: HashSet<&str> = pipe_list.iter().map(|p| p.id.as_str()).collect();
    let segment_list = read_segments(segments, &known).map_err(|e| in_file(segments, e))?;
    Ok(Route {
        pipes: pipe_list,
        segments: segment_list,
    })
}

pub fn write_route_csv(route: &Route, pipes: &str, segments: &str) -> io::Result<()> {
    let mut p_file = std::fs::File::create(pipes)?;
    for p in &route.pipes {
        writeln!(
            p_file,
            "{},{},{},{},{},{},{}",
            p.id, p.from, p.to, p.length, p.level_source, p.level_target, p.height
        )?;
    }
    let mut s_file = std::fs::File::create(segments)?;
    for s in &route.segments {
        writeln!(s_file, "{},{},{}", s.pipe, s.chainage, s.end_chainage)?;
    }
    Ok(())
}
