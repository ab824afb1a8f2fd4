// kwargs
/// Build construction arguments: `kwargs! { x: 1, name: "a" }`.
/// Each value goes through `Into<Value>`.
#[macro_export]
macro_rules! kwargs {
    () => {
        ::std::vec::Vec::<(::std::string::String, $crate::value::Value)>::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {
        ::std::vec![
            $((
                ::std::string::String::from(stringify!($name)),
                $crate::value::Value::from($value),
            )),+
        ]
    };
}
