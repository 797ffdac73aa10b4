//! Request and response frames.
//!
//! ```text
//! request:  [i32 length][i16 op_code][i64 query_id][body]
//! response: [i32 length][i64 query_id][i32 status][body | i32 len, utf8 error]
//! ```
//!
//! `length` counts every byte after itself. Configuration requests prefix
//! the body with its own `i32` length.

use std::borrow::Cow;
use std::sync::atomic::{AtomicI64, Ordering};

use super::constants::{
    REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE, SIZE_OF_LENGTH_FIELD, STATUS_SUCCESS,
};
use super::schema::Schema;
use crate::error::{IgniteError, Result};
use crate::serialization::{
    wire_len, DataInput, DataOutput, ObjectDataInput, ObjectDataOutput, Record, TypeDescriptor,
    Value,
};

/// Global query id counter.
static QUERY_ID_COUNTER: AtomicI64 = AtomicI64::new(1);

/// Generates a unique query id for a request. Never zero.
pub fn next_query_id() -> i64 {
    QUERY_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A request: op code, query id and the body described by a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    op_code: i16,
    query_id: i64,
    config: bool,
    schema: Schema,
    values: Vec<Value>,
}

impl Request {
    /// Creates a request with a freshly generated query id and an empty body.
    pub fn new(op_code: i16) -> Self {
        Self {
            op_code,
            query_id: next_query_id(),
            config: false,
            schema: Schema::empty(),
            values: Vec::new(),
        }
    }

    /// Creates a configuration request, whose body carries its own length.
    pub fn config(op_code: i16) -> Self {
        Self {
            config: true,
            ..Self::new(op_code)
        }
    }

    /// Creates a request from a schema and one value per field.
    pub fn from_parts(op_code: i16, query_id: Option<i64>, schema: Schema, values: Vec<Value>) -> Self {
        Self {
            op_code,
            query_id: query_id.unwrap_or_else(next_query_id),
            config: false,
            schema,
            values,
        }
    }

    /// Replaces the generated query id.
    pub fn with_query_id(mut self, query_id: i64) -> Self {
        self.query_id = query_id;
        self
    }

    /// Appends a body field.
    pub fn field(
        mut self,
        name: impl Into<Cow<'static, str>>,
        ty: TypeDescriptor,
        value: impl Into<Value>,
    ) -> Self {
        self.schema = std::mem::take(&mut self.schema).with(name, ty);
        self.values.push(value.into());
        self
    }

    /// Returns the op code.
    pub fn op_code(&self) -> i16 {
        self.op_code
    }

    /// Returns the query id.
    pub fn query_id(&self) -> i64 {
        self.query_id
    }

    /// Returns true for configuration requests.
    pub fn is_config(&self) -> bool {
        self.config
    }

    /// Returns the body schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the body values in field order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value of the named body field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .fields()
            .position(|field| field.name() == name)
            .and_then(|index| self.values.get(index))
    }

    /// Encodes the request frame.
    pub fn encode(&self) -> Result<Vec<u8>> {
        write_request(
            self.op_code,
            self.query_id,
            self.config,
            &self.schema,
            &self.values,
        )
    }
}

/// Encodes a request frame. `query_id: None` generates one.
pub fn encode_request(
    op_code: i16,
    query_id: Option<i64>,
    schema: &Schema,
    values: &[Value],
) -> Result<Vec<u8>> {
    let query_id = query_id.unwrap_or_else(next_query_id);
    write_request(op_code, query_id, false, schema, values)
}

/// Encodes a configuration request frame: the body is prefixed with its
/// own `i32` length.
pub fn encode_config_request(
    op_code: i16,
    query_id: Option<i64>,
    schema: &Schema,
    values: &[Value],
) -> Result<Vec<u8>> {
    let query_id = query_id.unwrap_or_else(next_query_id);
    write_request(op_code, query_id, true, schema, values)
}

fn write_request(
    op_code: i16,
    query_id: i64,
    config: bool,
    schema: &Schema,
    values: &[Value],
) -> Result<Vec<u8>> {
    let mut out = ObjectDataOutput::new();
    out.write_int(0)?;
    out.write_short(op_code)?;
    out.write_long(query_id)?;

    let body_start = out.len();
    if config {
        out.write_int(0)?;
    }
    schema.write(&mut out, values)?;

    if config {
        let config_len = out.len() - body_start - SIZE_OF_LENGTH_FIELD;
        out.patch_int(body_start, wire_len(config_len)?)?;
    }
    let frame_len = out.len() - SIZE_OF_LENGTH_FIELD;
    out.patch_int(0, wire_len(frame_len)?)?;
    Ok(out.into_bytes())
}

/// Decodes a request frame against the schema its op code implies.
pub fn decode_request(schema: &Schema, bytes: &[u8]) -> Result<Request> {
    read_request(schema, bytes, false)
}

/// Decodes a configuration request frame.
pub fn decode_config_request(schema: &Schema, bytes: &[u8]) -> Result<Request> {
    read_request(schema, bytes, true)
}

fn read_request(schema: &Schema, bytes: &[u8], config: bool) -> Result<Request> {
    let mut input = framed_input(bytes, REQUEST_HEADER_SIZE)?;
    let op_code = input.read_short()?;
    let query_id = input.read_long()?;

    if config {
        let config_len = input.read_len()?;
        if config_len != input.remaining() {
            return Err(IgniteError::Decode(format!(
                "configuration length {} does not match {} remaining bytes",
                config_len,
                input.remaining()
            )));
        }
    }
    let record = schema.read(&mut input)?;
    ensure_consumed(&input)?;

    Ok(Request {
        op_code,
        query_id,
        config,
        schema: schema.clone(),
        values: record.values().cloned().collect(),
    })
}

/// Body of a decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Fields of the response schema, by name.
    Success(Record),
    /// Error text sent by the server.
    Failure(String),
}

/// A decoded response frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Query id echoed by the server.
    pub query_id: i64,
    /// Zero on success.
    pub status: i32,
    /// Decoded fields or error text.
    pub body: ResponseBody,
}

impl Response {
    /// Creates a successful response.
    pub fn success(query_id: i64, record: Record) -> Self {
        Self {
            query_id,
            status: STATUS_SUCCESS,
            body: ResponseBody::Success(record),
        }
    }

    /// Creates a failed response.
    pub fn failure(query_id: i64, status: i32, message: impl Into<String>) -> Self {
        Self {
            query_id,
            status,
            body: ResponseBody::Failure(message.into()),
        }
    }

    /// Returns true if the status is zero.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Returns the decoded fields of a successful response.
    pub fn record(&self) -> Option<&Record> {
        match &self.body {
            ResponseBody::Success(record) => Some(record),
            ResponseBody::Failure(_) => None,
        }
    }

    /// Returns the error text of a failed response.
    pub fn error(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Success(_) => None,
            ResponseBody::Failure(message) => Some(message),
        }
    }
}

/// Decodes a response frame.
///
/// A nonzero status stops decoding after the error text; the schema is
/// only applied to successful responses. Missing or trailing bytes are
/// decode errors.
pub fn decode_response(schema: &Schema, bytes: &[u8]) -> Result<Response> {
    let mut input = framed_input(bytes, RESPONSE_HEADER_SIZE)?;
    let query_id = input.read_long()?;
    let status = input.read_int()?;

    let body = if status == STATUS_SUCCESS {
        ResponseBody::Success(schema.read(&mut input)?)
    } else {
        ResponseBody::Failure(input.read_string()?)
    };
    ensure_consumed(&input)?;

    Ok(Response {
        query_id,
        status,
        body,
    })
}

/// Encodes a response frame, writing a success record in schema order.
pub fn encode_response(schema: &Schema, response: &Response) -> Result<Vec<u8>> {
    let mut out = ObjectDataOutput::new();
    out.write_int(0)?;
    out.write_long(response.query_id)?;
    out.write_int(response.status)?;

    match (&response.body, response.status == STATUS_SUCCESS) {
        (ResponseBody::Success(record), true) => {
            let values = schema
                .fields()
                .map(|field| {
                    record.get(field.name()).cloned().ok_or_else(|| {
                        IgniteError::Encode(format!("response is missing field '{}'", field.name()))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            schema.write(&mut out, &values)?;
        }
        (ResponseBody::Failure(message), false) => out.write_string(message)?,
        _ => {
            return Err(IgniteError::Encode(format!(
                "status {} does not match the response body",
                response.status
            )))
        }
    }

    let frame_len = out.len() - SIZE_OF_LENGTH_FIELD;
    out.patch_int(0, wire_len(frame_len)?)?;
    Ok(out.into_bytes())
}

fn framed_input(bytes: &[u8], header_size: usize) -> Result<ObjectDataInput<'_>> {
    let mut input = ObjectDataInput::new(bytes);
    let length = input.read_len()?;
    if length != input.remaining() {
        return Err(IgniteError::Decode(format!(
            "frame length {} does not match {} received bytes",
            length,
            input.remaining()
        )));
    }
    if length < header_size {
        return Err(IgniteError::Decode(format!(
            "frame of {} bytes is shorter than its {}-byte header",
            length, header_size
        )));
    }
    Ok(input)
}

fn ensure_consumed(input: &ObjectDataInput<'_>) -> Result<()> {
    if input.remaining() == 0 {
        Ok(())
    } else {
        Err(IgniteError::Decode(format!(
            "{} trailing bytes after the last field",
            input.remaining()
        )))
    }
}
