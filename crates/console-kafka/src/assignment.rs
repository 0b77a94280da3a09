//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Consumer protocol member assignment codec
//!
//! Layout, all big-endian: `i16` version, `i32` topic count, then per topic an
//! `i16` name length, the name bytes, an `i32` partition count and the `i32`
//! partition ids. Trailing user data is ignored.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{KafkaError, KafkaResult};

/// Topic to assigned partitions
pub type MemberAssignment = BTreeMap<String, Vec<i32>>;

/// Decode a member assignment
pub fn parse_member_assignment(data: &[u8]) -> KafkaResult<MemberAssignment> {
    let mut assignment = MemberAssignment::new();
    if data.is_empty() {
        return Ok(assignment);
    }

    let mut cursor = Cursor::new(data);
    let _version = cursor.read_i16::<BigEndian>().map_err(truncated)?;

    let topic_count = cursor.read_i32::<BigEndian>().map_err(truncated)?;
    if topic_count < 0 {
        return Err(KafkaError::deserialization("Negative topic count in assignment"));
    }

    for _ in 0..topic_count {
        let name_len = cursor.read_i16::<BigEndian>().map_err(truncated)?;
        if name_len < 0 {
            return Err(KafkaError::deserialization("Negative topic name length in assignment"));
        }

        let mut name = vec![0; name_len as usize];
        cursor.read_exact(&mut name).map_err(truncated)?;
        let topic = String::from_utf8(name)
            .map_err(|e| KafkaError::deserialization(&format!("Invalid topic name: {}", e)))?;

        let partition_count = cursor.read_i32::<BigEndian>().map_err(truncated)?;
        let mut partitions = Vec::with_capacity(partition_count.clamp(0, 1024) as usize);
        for _ in 0..partition_count.max(0) {
            partitions.push(cursor.read_i32::<BigEndian>().map_err(truncated)?);
        }

        assignment.entry(topic).or_default().extend(partitions);
    }

    Ok(assignment)
}

/// Encode a member assignment with version 0 and no user data
pub fn encode_member_assignment(assignment: &MemberAssignment) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writes into a Vec cannot fail
    let _ = write_assignment(&mut buf, assignment);
    buf
}

fn write_assignment(buf: &mut Vec<u8>, assignment: &MemberAssignment) -> std::io::Result<()> {
    buf.write_i16::<BigEndian>(0)?;
    buf.write_i32::<BigEndian>(assignment.len() as i32)?;
    for (topic, partitions) in assignment {
        buf.write_i16::<BigEndian>(topic.len() as i16)?;
        buf.extend_from_slice(topic.as_bytes());
        buf.write_i32::<BigEndian>(partitions.len() as i32)?;
        for partition in partitions {
            buf.write_i32::<BigEndian>(*partition)?;
        }
    }
    buf.write_i32::<BigEndian>(-1)?;
    Ok(())
}

fn truncated(e: std::io::Error) -> KafkaError {
    KafkaError::deserialization(&format!("Truncated member assignment: {}", e))
}
