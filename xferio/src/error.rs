// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};

pub type ErrorBox = Box<dyn StdError + Send + Sync>;

pub trait OperationKind: Copy + Debug + Display { }

pub trait ErrorKind: Copy + Debug + Display {
	fn other(message: &'static str) -> Self;
}

/// An error raised by some operation `O`, classified by a kind `K`, optionally
/// caused by a `source` error.
#[derive(Debug)]
pub struct Error<O: OperationKind, K: ErrorKind> {
	op: O,
	kind: K,
	source: Option<ErrorBox>,
}

impl<O: OperationKind, K: ErrorKind> Display for Error<O, K> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{op} failed; {kind} ({source})")
		} else {
			write!(f, "{op} failed; {kind}")
		}
	}
}

impl<O: OperationKind, K: ErrorKind> StdError for Error<O, K> {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl<O: OperationKind, K: ErrorKind> Error<O, K> {
	pub(crate) fn new(op: O, kind: K, source: Option<ErrorBox>) -> Self {
		Self { op, kind, source }
	}

	/// Creates a new error with a custom message.
	pub fn other(op: O, message: &'static str, source: Option<ErrorBox>) -> Self {
		Self::new(op, K::other(message), source)
	}

	/// Returns the operation kind.
	pub fn operation(&self) -> O { self.op }

	/// Sets the operation kind.
	pub fn with_operation(mut self, op: O) -> Self {
		self.op = op;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> K { self.kind }

	/// Returns the source error, downcast to `E` if it is one.
	pub fn source_as<E: StdError + 'static>(&self) -> Option<&E> {
		self.source.as_deref()?.downcast_ref()
	}

	/// Consumes the error, returning its boxed source.
	pub fn into_source(self) -> Option<ErrorBox> { self.source }
}
