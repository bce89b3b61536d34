macro_rules! pop {
	( $name:expr, $args:expr, $( $x:ident ),* ) => (
		let expected = <[&str]>::len(&[$( stringify!($x) ),*]);
		if $args.len() != expected {
			return Err(crate::eval::arity($name, expected, $args.len()));
		}
		let mut args = $args.into_iter();
		$(
			let $x = match args.next() {
				Some(value) => value,
				None => return Err(crate::eval::arity($name, expected, 0)),
			};
		)*
	);
}

macro_rules! pop_int {
	( $name:expr, $args:expr, $( $x:ident ),* ) => (
		pop!($name, $args, $( $x ),*);
		$(
			let $x = crate::eval::expect_int($name, $x)?;
		)*
	);
}

macro_rules! pop_bytes {
	( $name:expr, $args:expr, $( $x:ident ),* ) => (
		pop!($name, $args, $( $x ),*);
		$(
			let $x = crate::eval::expect_bytes($name, $x)?;
		)*
	);
}

macro_rules! checked_or_fail {
	( $name:expr, $e:expr ) => {
		match $e {
			Some(v) => v,
			None => return Err(ride_core::ErrorKind::RuntimeError.error(
				alloc::format!("{}: long overflow", $name)
			)),
		}
	};
}
